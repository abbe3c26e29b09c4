use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::{Fleet, Ship, Weapon};
use crate::data::scenario::{FleetInput, Scenario, ScenarioInput, ShipInput, WeaponInput};

/// More weapon-firing events per round than this makes exact enumeration slow.
pub const WEAPON_EVENT_WARNING: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Warning)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, diag) in self.diagnostics.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{diag}")?;
        }
        Ok(())
    }
}

/// Integer-valued check on a loosely typed number. Returns the value when it is an
/// integer inside `[min, max]`.
fn integer_in_range(value: f64, min: i64, max: i64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < min as f64 || value > max as f64 {
        return None;
    }
    Some(value as i64)
}

struct ShipChecker<'a> {
    report: &'a mut ValidationReport,
    label: String,
}

impl ShipChecker<'_> {
    fn check(&mut self, value: f64, min: i64, max: i64, message: &str) -> Option<i64> {
        let checked = integer_in_range(value, min, max);
        if checked.is_none() {
            self.report
                .push(ValidationSeverity::Error, self.label.clone(), message);
        }
        checked
    }

    fn weapons(&mut self, kind: &str, weapons: &[WeaponInput]) -> Option<Vec<Weapon>> {
        let mut out = Vec::with_capacity(weapons.len());
        let mut valid = true;
        for (index, weapon) in weapons.iter().enumerate() {
            match integer_in_range(weapon.damage, 1, i64::from(u32::MAX)) {
                Some(damage) => out.push(Weapon::new(damage as u32)),
                None => {
                    self.report.push(
                        ValidationSeverity::Error,
                        format!("{} {kind} {}", self.label, index + 1),
                        "Damage must be a positive integer",
                    );
                    valid = false;
                }
            }
        }
        valid.then_some(out)
    }
}

fn validate_ship(
    report: &mut ValidationReport,
    player: u8,
    index: usize,
    input: &ShipInput,
) -> Option<Ship> {
    let mut checker = ShipChecker {
        report,
        label: format!("Player {player} Ship {}", index + 1),
    };
    let u32_max = i64::from(u32::MAX);

    let health_points = checker.check(
        input.health_points,
        1,
        u32_max,
        "Health Points must be a positive integer",
    );
    let initiative = checker.check(
        input.initiative,
        0,
        u32_max,
        "Initiative must be a non-negative integer",
    );
    let shield = checker.check(
        input.shield,
        i64::from(i32::MIN),
        0,
        "Shield must be a non-positive integer",
    );
    let attack_modifier = checker.check(
        input.attack_modifier,
        0,
        u32_max,
        "Attack Modifier must be a non-negative integer",
    );
    let guns = checker.weapons("Gun", &input.guns);
    let missiles = checker.weapons("Missile", &input.missiles);

    if input.guns.is_empty() && input.missiles.is_empty() {
        checker.report.push(
            ValidationSeverity::Warning,
            checker.label.clone(),
            "ship has no weapons and can never deal damage",
        );
    }

    Some(Ship {
        health_points: health_points? as u32,
        initiative: initiative? as u32,
        shield: shield? as i32,
        attack_modifier: attack_modifier? as u32,
        guns: guns?,
        missiles: missiles?,
    })
}

fn validate_fleet(report: &mut ValidationReport, player: u8, input: &FleetInput) -> Fleet {
    if input.ships.is_empty() {
        report.push(
            ValidationSeverity::Error,
            format!("Player {player}"),
            "must field at least one ship",
        );
    }
    let ships = input
        .ships
        .iter()
        .enumerate()
        .filter_map(|(index, ship)| validate_ship(report, player, index, ship))
        .collect();
    Fleet::new(ships)
}

/// Check every field of both fleets and build the integer-typed [Scenario].
/// All problems are collected before giving up; warnings never block.
pub fn validate_scenario(input: &ScenarioInput) -> (Option<Scenario>, ValidationReport) {
    let mut report = ValidationReport::default();
    let player1 = validate_fleet(&mut report, 1, &input.player1);
    let player2 = validate_fleet(&mut report, 2, &input.player2);

    if report.has_errors() {
        return (None, report);
    }

    let events = player1.weapon_count() + player2.weapon_count();
    if events > WEAPON_EVENT_WARNING {
        report.push(
            ValidationSeverity::Warning,
            "battle",
            format!(
                "{events} weapon shots per round; a round can branch into up to 2^{events} states before merging"
            ),
        );
    }

    let scenario = Scenario {
        name: input.name.clone(),
        player1,
        player2,
    };
    (Some(scenario), report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(health_points: f64) -> ShipInput {
        ShipInput {
            health_points,
            guns: vec![WeaponInput { damage: 1.0 }],
            ..ShipInput::default()
        }
    }

    fn scenario(p1: Vec<ShipInput>, p2: Vec<ShipInput>) -> ScenarioInput {
        ScenarioInput {
            name: None,
            player1: FleetInput { ships: p1 },
            player2: FleetInput { ships: p2 },
        }
    }

    #[test]
    fn valid_input_produces_integer_fleets() {
        let mut armed = ship(3.0);
        armed.shield = -1.0;
        armed.attack_modifier = 2.0;
        armed.missiles = vec![WeaponInput { damage: 4.0 }];
        let (parsed, report) = validate_scenario(&scenario(vec![armed], vec![ship(1.0)]));

        assert!(!report.has_errors(), "{report}");
        let parsed = parsed.expect("scenario should validate");
        let ship = &parsed.player1.ships[0];
        assert_eq!(ship.health_points, 3);
        assert_eq!(ship.shield, -1);
        assert_eq!(ship.attack_modifier, 2);
        assert_eq!(ship.missiles, vec![Weapon::new(4)]);
    }

    #[test]
    fn every_violation_is_reported_with_a_label() {
        let mut bad = ship(0.0);
        bad.initiative = -1.0;
        bad.shield = 2.0;
        bad.attack_modifier = 1.5;
        bad.guns = vec![WeaponInput { damage: 1.0 }, WeaponInput { damage: 0.0 }];
        let (parsed, report) = validate_scenario(&scenario(vec![ship(1.0)], vec![bad]));

        assert!(parsed.is_none());
        let messages: Vec<String> = report
            .errors()
            .map(|diag| format!("{}: {}", diag.context, diag.message))
            .collect();
        assert_eq!(
            messages,
            vec![
                "Player 2 Ship 1: Health Points must be a positive integer",
                "Player 2 Ship 1: Initiative must be a non-negative integer",
                "Player 2 Ship 1: Shield must be a non-positive integer",
                "Player 2 Ship 1: Attack Modifier must be a non-negative integer",
                "Player 2 Ship 1 Gun 2: Damage must be a positive integer",
            ]
        );
    }

    #[test]
    fn report_renders_severity_labels() {
        let mut report = ValidationReport::default();
        report.push(ValidationSeverity::Error, "Player 1", "must field at least one ship");
        report.push(ValidationSeverity::Warning, "battle", "slow");
        assert_eq!(
            report.to_string(),
            "[error] Player 1: must field at least one ship\n[warning] battle: slow"
        );
    }

    #[test]
    fn empty_fleet_is_rejected() {
        let (parsed, report) = validate_scenario(&scenario(Vec::new(), vec![ship(1.0)]));
        assert!(parsed.is_none());
        assert!(report.errors().any(|diag| diag.context == "Player 1"));
    }

    #[test]
    fn unarmed_ship_is_only_a_warning() {
        let (parsed, report) =
            validate_scenario(&scenario(vec![ShipInput::default()], vec![ship(1.0)]));
        assert!(parsed.is_some());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn heavy_battles_warn_about_branching() {
        let mut gunboat = ship(5.0);
        gunboat.guns = vec![WeaponInput { damage: 1.0 }; 25];
        let (parsed, report) = validate_scenario(&scenario(vec![gunboat], vec![ship(1.0)]));
        assert!(parsed.is_some());
        assert!(report.warnings().any(|diag| diag.context == "battle"));
    }
}
