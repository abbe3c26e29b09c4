//! Battle simulator: drives rounds over the full outcome distribution, merges
//! equivalent states after every round and folds resolved states into win and
//! survival probabilities. The computation is exact up to f64 rounding; nothing
//! is sampled.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::combat::fleet::{Fleet, Side};
use crate::combat::round::execute_round;
use crate::combat::state::{merge_states, total_probability, BattleState, Distribution};

/// Tolerance for probability conservation checks.
pub const EPSILON: f64 = 1e-9;

pub const DEFAULT_MAX_ROUNDS: u32 = 100;
pub const DEFAULT_STATE_WARNING_THRESHOLD: usize = 1 << 20;

pub const MAX_ROUNDS_ENV: &str = "BROADSIDE_MAX_ROUNDS";
pub const STATE_WARNING_ENV: &str = "BROADSIDE_STATE_WARNING";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Rounds played before unresolved states are scored as a coin flip.
    pub max_rounds: u32,
    /// Pre-merge pool size above which a warning is logged.
    pub state_warning_threshold: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            state_warning_threshold: DEFAULT_STATE_WARNING_THRESHOLD,
        }
    }
}

impl SimulationConfig {
    /// Defaults overridden by `BROADSIDE_MAX_ROUNDS` / `BROADSIDE_STATE_WARNING`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_rounds: env_override(MAX_ROUNDS_ENV, defaults.max_rounds),
            state_warning_threshold: env_override(
                STATE_WARNING_ENV,
                defaults.state_warning_threshold,
            ),
        }
    }
}

fn env_override<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, %default, "ignoring unparsable override");
            default
        }),
        Err(_) => default,
    }
}

/// Bookkeeping about how the search went; not part of the probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleStats {
    pub rounds_executed: u32,
    /// Largest pre-merge pool seen in any round.
    pub peak_states: usize,
    /// True when the round cap ended the battle with states left over.
    pub timed_out: bool,
    /// Mass that was split 50/50 because of the round cap.
    pub timeout_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub player1_win_chance: f64,
    pub player2_win_chance: f64,
    /// P(player 1 wins and ship `i` is still afloat).
    pub player1_ship_survival: Vec<f64>,
    /// P(player 2 wins and ship `i` is still afloat).
    pub player2_ship_survival: Vec<f64>,
    pub stats: BattleStats,
}

impl BattleResult {
    pub fn win_chance(&self, side: Side) -> f64 {
        match side {
            Side::Player1 => self.player1_win_chance,
            Side::Player2 => self.player2_win_chance,
        }
    }

    pub fn ship_survival(&self, side: Side) -> &[f64] {
        match side {
            Side::Player1 => &self.player1_ship_survival,
            Side::Player2 => &self.player2_ship_survival,
        }
    }
}

struct Tally {
    player1_wins: f64,
    player2_wins: f64,
    player1_survival: Vec<f64>,
    player2_survival: Vec<f64>,
}

impl Tally {
    fn new(player1: &Fleet, player2: &Fleet) -> Self {
        Self {
            player1_wins: 0.0,
            player2_wins: 0.0,
            player1_survival: vec![0.0; player1.len()],
            player2_survival: vec![0.0; player2.len()],
        }
    }

    fn split(&mut self, probability: f64) {
        self.player1_wins += probability * 0.5;
        self.player2_wins += probability * 0.5;
    }

    fn victory(&mut self, winner: Side, state: &BattleState) {
        let (wins, survival) = match winner {
            Side::Player1 => (&mut self.player1_wins, &mut self.player1_survival),
            Side::Player2 => (&mut self.player2_wins, &mut self.player2_survival),
        };
        *wins += state.probability;
        for (slot, hp) in survival.iter_mut().zip(state.hp(winner)) {
            if *hp > 0 {
                *slot += state.probability;
            }
        }
    }

    fn into_result(self, stats: BattleStats) -> BattleResult {
        BattleResult {
            player1_win_chance: self.player1_wins,
            player2_win_chance: self.player2_wins,
            player1_ship_survival: self.player1_survival,
            player2_ship_survival: self.player2_survival,
            stats,
        }
    }
}

/// Exact win and survival probabilities with the default 100-round cap.
pub fn simulate(player1: &Fleet, player2: &Fleet) -> BattleResult {
    simulate_battle(player1, player2, &SimulationConfig::default())
}

pub fn simulate_battle(player1: &Fleet, player2: &Fleet, config: &SimulationConfig) -> BattleResult {
    let mut states: Distribution = vec![BattleState::initial(player1, player2)];
    let mut tally = Tally::new(player1, player2);
    let mut stats = BattleStats::default();

    while !states.is_empty() && stats.rounds_executed < config.max_rounds {
        stats.rounds_executed += 1;
        let mut pool: Distribution = Vec::new();

        for state in states {
            match (state.is_alive(Side::Player1), state.is_alive(Side::Player2)) {
                (false, false) => tally.split(state.probability),
                (false, true) => tally.victory(Side::Player2, &state),
                (true, false) => tally.victory(Side::Player1, &state),
                (true, true) => {
                    let weight = state.probability;
                    pool.extend(execute_round(&state, player1, player2).into_iter().map(
                        |mut outcome| {
                            outcome.probability *= weight;
                            outcome
                        },
                    ));
                }
            }
        }

        stats.peak_states = stats.peak_states.max(pool.len());
        if pool.len() > config.state_warning_threshold {
            warn!(
                round = stats.rounds_executed,
                states = pool.len(),
                threshold = config.state_warning_threshold,
                "pre-merge state pool is unusually large"
            );
        }

        let pre_merge = pool.len();
        states = merge_states(pool);
        debug!(
            round = stats.rounds_executed,
            pre_merge,
            live = states.len(),
            "round complete"
        );
    }

    if !states.is_empty() {
        let remaining = total_probability(&states);
        warn!(
            rounds = stats.rounds_executed,
            states = states.len(),
            probability = remaining,
            "round cap reached; scoring remaining states as a draw"
        );
        tally.split(remaining);
        stats.timed_out = true;
        stats.timeout_probability = remaining;
    }

    tally.into_result(stats)
}
