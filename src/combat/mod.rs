pub mod dice;
pub mod engine;
pub mod export_csv;
pub mod fleet;
pub mod phase;
pub mod round;
pub mod state;
pub mod weapon;

pub use dice::{favorable_faces, hit_threshold, HitChance, DIE_FACES};
pub use engine::{
    simulate, simulate_battle, BattleResult, BattleStats, SimulationConfig, DEFAULT_MAX_ROUNDS,
    EPSILON,
};
pub use export_csv::{results_to_csv_string, write_results_csv};
pub use fleet::{Fleet, Ship, Side, Weapon};
pub use phase::{execute_guns_phase, execute_missile_phase, execute_phase};
pub use round::{execute_round, turn_order, TurnSlot};
pub use state::{merge_states, total_probability, BattleState, Distribution};
pub use weapon::{fire_weapon, select_target};
