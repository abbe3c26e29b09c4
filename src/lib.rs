//! Exact win probabilities for dice-based fleet battles.
//!
//! The engine in [combat] enumerates every outcome of a battle as a weighted
//! distribution over ship HP, merging identical configurations after each round,
//! and folds resolved states into win and per-ship survival probabilities.
//! [data] loads and validates scenario files, [parallel] evaluates many scenarios
//! at once and [cli] wires it all to the `broadside` binary.

pub mod cli;
pub mod combat;
pub mod data;
pub mod parallel;

pub use combat::{simulate, BattleResult, Fleet, Ship, Weapon};
