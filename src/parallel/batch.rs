//! Batch evaluation of independent scenarios.
//!
//! Each scenario is a pure, single-threaded computation, so a batch is an
//! embarrassingly parallel map. [batch_ranges] splits the list into chunks so
//! callers can report progress between chunks.

use rayon::prelude::*;
use tracing::info;

use crate::combat::{simulate_battle, BattleResult, SimulationConfig};
use crate::data::Scenario;
use crate::parallel::pool::WorkerPool;

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use broadside::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Simulate every scenario on the current Rayon pool. Output order matches input.
pub fn simulate_scenarios(scenarios: &[Scenario], config: &SimulationConfig) -> Vec<BattleResult> {
    scenarios
        .par_iter()
        .map(|scenario| simulate_battle(&scenario.player1, &scenario.player2, config))
        .collect()
}

/// Simulate `scenarios` on `pool`, `progress_batches` chunks at a time, logging
/// after each chunk.
pub fn run_scenario_batch(
    scenarios: &[Scenario],
    config: &SimulationConfig,
    pool: &WorkerPool,
    progress_batches: usize,
) -> Result<Vec<BattleResult>, rayon::ThreadPoolBuildError> {
    let ranges = batch_ranges(scenarios.len(), progress_batches.max(1));
    pool.install(|| {
        let mut results = Vec::with_capacity(scenarios.len());
        for (done, (start, end)) in ranges.iter().enumerate() {
            results.extend(simulate_scenarios(&scenarios[*start..*end], config));
            info!(
                batch = done + 1,
                batches = ranges.len(),
                completed = *end,
                total = scenarios.len(),
                "batch progress"
            );
        }
        results
    })
}
