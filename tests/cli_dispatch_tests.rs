use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_broadside")
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("broadside-{name}-{stamp}.{extension}"))
}

const SKIRMISH_YAML: &str = "\
name: skirmish
player1:
  ships:
    - health_points: 3
      attack_modifier: 1
      guns: [{ damage: 2 }]
player2:
  ships:
    - health_points: 2
      initiative: 2
      guns: [{ damage: 1 }]
      missiles: [{ damage: 1 }]
";

#[test]
fn simulate_without_path_runs_default_duel_as_json() {
    let output = Command::new(bin())
        .arg("simulate")
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("simulate should emit json");
    assert_eq!(payload["scenario"], "default duel");
    let p1 = payload["player1_win_chance"].as_f64().expect("p1 chance");
    assert!((p1 - 6.0 / 11.0).abs() < 1e-9);
    assert_eq!(payload["player2_ship_survival"].as_array().map(Vec::len), Some(1));
    assert!(payload["stats"]["rounds_executed"].is_number());
}

#[test]
fn simulate_table_uses_percentages() {
    let output = Command::new(bin())
        .args(["simulate", "--table"])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Player 1 Win Rate: 54.55%"));
    assert!(stdout.contains("Player 2 Win Rate: 45.45%"));
}

#[test]
fn simulate_reads_yaml_scenario() {
    let path = unique_temp_path("skirmish", "yaml");
    fs::write(&path, SKIRMISH_YAML).expect("fixture should be written");

    let output = Command::new(bin())
        .args(["simulate", path.to_string_lossy().as_ref()])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("simulate should emit json");
    assert_eq!(payload["scenario"], "skirmish");
    let total = payload["player1_win_chance"].as_f64().unwrap_or_default()
        + payload["player2_win_chance"].as_f64().unwrap_or_default();
    assert!((total - 1.0).abs() < 1e-9);

    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_lists_violations() {
    let path = unique_temp_path("invalid", "json");
    fs::write(
        &path,
        r#"{"player1": {"ships": [{"health_points": 0, "shield": 1}]}, "player2": {"ships": []}}"#,
    )
    .expect("fixture should be written");

    let output = Command::new(bin())
        .args(["validate", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));
    assert!(stderr.contains("Player 1 Ship 1: Health Points must be a positive integer"));
    assert!(stderr.contains("Player 1 Ship 1: Shield must be a non-positive integer"));
    assert!(stderr.contains("Player 2: must field at least one ship"));

    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_returns_usage_without_path() {
    let output = Command::new(bin())
        .arg("validate")
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: broadside validate"));
}

#[test]
fn batch_command_emits_csv_for_every_scenario() {
    let first = unique_temp_path("batch-a", "yaml");
    let second = unique_temp_path("batch-b", "yml");
    fs::write(&first, SKIRMISH_YAML).expect("fixture should be written");
    fs::write(
        &second,
        "player1:\n  ships:\n    - guns: [{}]\nplayer2:\n  ships:\n    - guns: [{}]\n",
    )
    .expect("fixture should be written");

    let output = Command::new(bin())
        .args([
            "batch",
            first.to_string_lossy().as_ref(),
            second.to_string_lossy().as_ref(),
            "--workers",
            "2",
            "--csv",
        ])
        .output()
        .expect("batch should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "scenario,player,row,ship,probability");
    assert_eq!(lines.len(), 1 + 4 + 4);
    assert!(lines[1].starts_with("skirmish,1,fleet,,"));

    let _ = fs::remove_file(first);
    let _ = fs::remove_file(second);
}

#[test]
fn unknown_command_prints_usage() {
    let output = Command::new(bin())
        .arg("serve")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: broadside"));
}

#[test]
fn unsupported_extension_fails() {
    let output = Command::new(bin())
        .args(["simulate", "fleet.toml"])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported scenario format"));
}

fn simulate_json_with_max_rounds(value: &str) -> serde_json::Value {
    let output = Command::new(bin())
        .env("BROADSIDE_MAX_ROUNDS", value)
        .arg("simulate")
        .output()
        .expect("simulate should run");
    assert_eq!(output.status.code(), Some(0));
    serde_json::from_slice(&output.stdout).expect("simulate should emit json")
}

#[test]
fn max_rounds_env_overrides_round_cap() {
    let payload = simulate_json_with_max_rounds("1");
    assert_eq!(payload["stats"]["rounds_executed"], 1);
    assert_eq!(payload["stats"]["timed_out"], true);
    let p1 = payload["player1_win_chance"].as_f64().expect("p1 chance");
    assert!((p1 - 0.5).abs() < 1e-9);
}

#[test]
fn unparsable_max_rounds_falls_back_to_default_cap() {
    let payload = simulate_json_with_max_rounds("abc");
    assert_eq!(payload["stats"]["rounds_executed"], 100);
    let p1 = payload["player1_win_chance"].as_f64().expect("p1 chance");
    assert!((p1 - 6.0 / 11.0).abs() < 1e-9);
}
