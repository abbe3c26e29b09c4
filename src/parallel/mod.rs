pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, run_scenario_batch, simulate_scenarios};
pub use pool::WorkerPool;
