use std::fmt::Write as _;

use serde::Serialize;
use tracing::{info, warn};

use crate::combat::{simulate_battle, write_results_csv, BattleResult, SimulationConfig, Side};
use crate::data::{load_scenario, Scenario, ScenarioError, ValidationReport};
use crate::parallel::{run_scenario_batch, WorkerPool};

/// Progress chunks for the batch command.
const BATCH_PROGRESS_CHUNKS: usize = 10;

const USAGE: &str = "usage: broadside <simulate|validate|batch>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Validate,
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
}

impl OutputFormat {
    fn from_args(args: &[String]) -> Self {
        if args.iter().any(|arg| arg == "--csv") {
            Self::Csv
        } else if args.iter().any(|arg| arg == "--table") {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("validate") => Some(Command::Validate),
        Some("batch") => Some(Command::Batch),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Batch) => handle_batch(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Positional arguments after the command, skipping flags and their values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        if arg == "--workers" {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
}

fn load_or_report(path: &str) -> Option<Scenario> {
    match load_scenario(path) {
        Ok((scenario, report)) => {
            for diag in report.warnings() {
                warn!(path, context = %diag.context, "{}", diag.message);
            }
            Some(scenario)
        }
        Err(ScenarioError::Invalid(report)) => {
            print_validation_failure(path, &report);
            None
        }
        Err(err) => {
            eprintln!("failed to load '{path}': {err}");
            None
        }
    }
}

fn print_validation_failure(path: &str, report: &ValidationReport) {
    eprintln!(
        "validation failed for '{path}': {} issue(s)",
        report.errors().count()
    );
    for diag in report.errors() {
        eprintln!("- {}: {}", diag.context, diag.message);
    }
}

fn handle_simulate(args: &[String]) -> i32 {
    let format = OutputFormat::from_args(args);
    let (label, scenario) = match positional(args).first() {
        Some(path) => match load_or_report(path) {
            Some(scenario) => (scenario.label(path), scenario),
            None => return 1,
        },
        None => {
            let scenario = Scenario::default_duel();
            (scenario.label("default duel"), scenario)
        }
    };

    let config = SimulationConfig::from_env();
    info!(scenario = %label, max_rounds = config.max_rounds, "simulating");
    let result = simulate_battle(&scenario.player1, &scenario.player2, &config);

    emit(format, &[(label, result)])
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = positional(args).first().copied() else {
        eprintln!("usage: broadside validate <scenario.json|scenario.yaml>");
        return 2;
    };

    match load_scenario(path) {
        Ok((_, report)) => {
            for diag in &report.diagnostics {
                eprintln!("- {diag}");
            }
            println!("validation passed: {path}");
            0
        }
        Err(ScenarioError::Invalid(report)) => {
            print_validation_failure(path, &report);
            1
        }
        Err(err) => {
            eprintln!("failed to load '{path}': {err}");
            1
        }
    }
}

fn handle_batch(args: &[String]) -> i32 {
    let paths = positional(args);
    if paths.is_empty() {
        eprintln!("usage: broadside batch <scenario>... [--workers N] [--csv|--table]");
        return 2;
    }

    let workers = parse_usize_arg(flag_value(args, "--workers"), "workers", 0);
    let mut labels = Vec::with_capacity(paths.len());
    let mut scenarios = Vec::with_capacity(paths.len());
    for path in &paths {
        let Some(scenario) = load_or_report(path) else {
            return 1;
        };
        labels.push(scenario.label(path));
        scenarios.push(scenario);
    }

    let config = SimulationConfig::from_env();
    let pool = WorkerPool::with_workers(workers);
    let results = match run_scenario_batch(&scenarios, &config, &pool, BATCH_PROGRESS_CHUNKS) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("failed to start worker pool: {err}");
            return 1;
        }
    };

    let labelled: Vec<(String, BattleResult)> = labels.into_iter().zip(results).collect();
    emit(OutputFormat::from_args(args), &labelled)
}

#[derive(Debug, Serialize)]
struct ScenarioReport<'a> {
    scenario: &'a str,
    #[serde(flatten)]
    result: &'a BattleResult,
}

fn emit(format: OutputFormat, results: &[(String, BattleResult)]) -> i32 {
    match format {
        OutputFormat::Json => {
            let reports: Vec<ScenarioReport<'_>> = results
                .iter()
                .map(|(scenario, result)| ScenarioReport { scenario, result })
                .collect();
            let payload = if reports.len() == 1 {
                serde_json::to_string_pretty(&reports[0])
            } else {
                serde_json::to_string_pretty(&reports)
            };
            match payload {
                Ok(payload) => println!("{payload}"),
                Err(err) => {
                    eprintln!("failed to serialize battle result: {err}");
                    return 1;
                }
            }
        }
        OutputFormat::Table => {
            for (scenario, result) in results {
                print!("{}", render_table(scenario, result));
            }
        }
        OutputFormat::Csv => {
            if let Err(err) = write_results_csv(std::io::stdout().lock(), results) {
                eprintln!("failed to write csv: {err}");
                return 1;
            }
        }
    }
    0
}

/// Human-readable summary in the fleet editor's format.
pub fn render_table(scenario: &str, result: &BattleResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scenario: {scenario}");
    for side in [Side::Player1, Side::Player2] {
        let _ = writeln!(
            out,
            "Player {} Win Rate: {:.2}%",
            side.number(),
            result.win_chance(side) * 100.0
        );
        let survival = result.ship_survival(side);
        if !survival.is_empty() {
            let _ = writeln!(out, "  Ship survival rates:");
            for (index, rate) in survival.iter().enumerate() {
                let _ = writeln!(out, "    Ship {}: {:.1}%", index + 1, rate * 100.0);
            }
        }
    }
    let stats = &result.stats;
    let _ = writeln!(
        out,
        "Rounds: {} (peak states: {}{})",
        stats.rounds_executed,
        stats.peak_states,
        if stats.timed_out {
            format!(", {:.2}% scored as draw at round cap", stats.timeout_probability * 100.0)
        } else {
            String::new()
        }
    );
    out
}

fn parse_usize_arg(raw: Option<&String>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
