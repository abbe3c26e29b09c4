//! Scenario files: two fleets described in JSON or YAML.
//!
//! Files are read into loosely typed `*Input` structs (numbers as `f64`, missing
//! fields defaulted the way the fleet editor defaults a new ship) and only become
//! [Scenario] after [crate::data::validate::validate_scenario] accepts them.
//! Field names are snake_case; the editor's camelCase spellings are accepted too.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{Fleet, Ship};
use crate::data::validate::{validate_scenario, ValidationReport};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported scenario format '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
    #[error("invalid scenario:\n{0}")]
    Invalid(ValidationReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Json,
    Yaml,
}

impl ScenarioFormat {
    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ScenarioError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponInput {
    pub damage: f64,
}

impl Default for WeaponInput {
    fn default() -> Self {
        Self { damage: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipInput {
    #[serde(alias = "healthPoints")]
    pub health_points: f64,
    pub initiative: f64,
    pub shield: f64,
    #[serde(alias = "attackModifier")]
    pub attack_modifier: f64,
    pub guns: Vec<WeaponInput>,
    pub missiles: Vec<WeaponInput>,
}

impl Default for ShipInput {
    fn default() -> Self {
        Self {
            health_points: 1.0,
            initiative: 1.0,
            shield: 0.0,
            attack_modifier: 0.0,
            guns: Vec::new(),
            missiles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetInput {
    #[serde(default)]
    pub ships: Vec<ShipInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    #[serde(default)]
    pub name: Option<String>,
    pub player1: FleetInput,
    pub player2: FleetInput,
}

/// Validated pair of fleets, ready for [crate::combat::simulate].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub player1: Fleet,
    pub player2: Fleet,
}

impl Scenario {
    /// The editor's opening matchup: one 1-HP ship with a 1-damage gun per side.
    pub fn default_duel() -> Self {
        let ship = Ship::new(1).with_gun(1);
        Self {
            name: Some("default duel".to_string()),
            player1: Fleet::single(ship.clone()),
            player2: Fleet::single(ship),
        }
    }

    /// Display name, falling back to `fallback` (usually the file path).
    pub fn label(&self, fallback: &str) -> String {
        self.name.clone().unwrap_or_else(|| fallback.to_string())
    }
}

pub fn parse_scenario_input(raw: &str, format: ScenarioFormat) -> Result<ScenarioInput, ScenarioError> {
    let input = match format {
        ScenarioFormat::Json => serde_json::from_str(raw)?,
        ScenarioFormat::Yaml => serde_yaml::from_str(raw)?,
    };
    Ok(input)
}

pub fn load_scenario_input(path: impl AsRef<Path>) -> Result<ScenarioInput, ScenarioError> {
    let path = path.as_ref();
    let format = ScenarioFormat::from_path(path)?;
    let raw = fs::read_to_string(path)?;
    parse_scenario_input(&raw, format)
}

/// Load and validate. Warnings are returned alongside the scenario; any error
/// becomes [ScenarioError::Invalid] carrying the full report.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<(Scenario, ValidationReport), ScenarioError> {
    let input = load_scenario_input(path)?;
    match validate_scenario(&input) {
        (Some(scenario), report) => Ok((scenario, report)),
        (None, report) => Err(ScenarioError::Invalid(report)),
    }
}
