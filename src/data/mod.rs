pub mod scenario;
pub mod validate;

pub use scenario::{
    load_scenario, load_scenario_input, parse_scenario_input, FleetInput, Scenario,
    ScenarioError, ScenarioFormat, ScenarioInput, ShipInput, WeaponInput,
};
pub use validate::{
    validate_scenario, ValidationDiagnostic, ValidationReport, ValidationSeverity,
    WEAPON_EVENT_WARNING,
};
