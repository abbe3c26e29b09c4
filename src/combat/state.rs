//! Weighted HP configurations and the merge step that keeps a distribution canonical.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::combat::fleet::{Fleet, Side};

/// One concrete hypothesis of current HP for every ship, with the probability of
/// reaching it from the starting state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub player1_hp: Vec<u32>,
    pub player2_hp: Vec<u32>,
    pub probability: f64,
}

/// All currently possible outcomes. Weights sum to 1.0; canonical (no duplicate HP
/// configurations) only right after [merge_states].
pub type Distribution = Vec<BattleState>;

impl BattleState {
    /// Starting state: every ship at template HP, weight 1.
    pub fn initial(player1: &Fleet, player2: &Fleet) -> Self {
        Self {
            player1_hp: player1.starting_hp(),
            player2_hp: player2.starting_hp(),
            probability: 1.0,
        }
    }

    pub fn hp(&self, side: Side) -> &[u32] {
        match side {
            Side::Player1 => &self.player1_hp,
            Side::Player2 => &self.player2_hp,
        }
    }

    pub fn hp_mut(&mut self, side: Side) -> &mut Vec<u32> {
        match side {
            Side::Player1 => &mut self.player1_hp,
            Side::Player2 => &mut self.player2_hp,
        }
    }

    /// True if any ship of `side` has HP left. An empty fleet is never alive.
    pub fn is_alive(&self, side: Side) -> bool {
        self.hp(side).iter().any(|hp| *hp > 0)
    }

    pub fn ship_alive(&self, side: Side, index: usize) -> bool {
        self.hp(side).get(index).is_some_and(|hp| *hp > 0)
    }

    /// Copy of this state with the weight scaled by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            player1_hp: self.player1_hp.clone(),
            player2_hp: self.player2_hp.clone(),
            probability: self.probability * factor,
        }
    }

    /// Copy of this state with ship `index` of `side` damaged, flooring HP at 0.
    pub fn damaged(&self, side: Side, index: usize, damage: u32, factor: f64) -> Self {
        let mut next = self.scaled(factor);
        if let Some(hp) = next.hp_mut(side).get_mut(index) {
            *hp = hp.saturating_sub(damage);
        }
        next
    }
}

/// Collapse states with identical HP vectors into one, summing their weights.
/// Output keeps the order in which each configuration was first seen.
pub fn merge_states(states: Distribution) -> Distribution {
    let mut merged: Distribution = Vec::with_capacity(states.len());
    let mut slots: HashMap<(Vec<u32>, Vec<u32>), usize> = HashMap::with_capacity(states.len());

    for state in states {
        match slots.entry((state.player1_hp.clone(), state.player2_hp.clone())) {
            Entry::Occupied(slot) => merged[*slot.get()].probability += state.probability,
            Entry::Vacant(slot) => {
                slot.insert(merged.len());
                merged.push(state);
            }
        }
    }

    merged
}

/// Sum of weights; 1.0 for any distribution reachable from [BattleState::initial].
pub fn total_probability(states: &[BattleState]) -> f64 {
    states.iter().map(|state| state.probability).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(p1: &[u32], p2: &[u32], probability: f64) -> BattleState {
        BattleState {
            player1_hp: p1.to_vec(),
            player2_hp: p2.to_vec(),
            probability,
        }
    }

    #[test]
    fn merge_sums_identical_configurations() {
        let merged = merge_states(vec![
            state(&[2], &[1], 0.25),
            state(&[2], &[0], 0.25),
            state(&[2], &[1], 0.5),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].player2_hp, vec![1]);
        assert!((merged[0].probability - 0.75).abs() < 1e-15);
        assert!((total_probability(&merged) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn merge_distinguishes_which_fleet_holds_the_hp() {
        let merged = merge_states(vec![state(&[1, 0], &[1], 0.5), state(&[1], &[0, 1], 0.5)]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn damage_floors_at_zero_and_scales_weight() {
        let base = state(&[3], &[2, 5], 0.5);
        let hit = base.damaged(Side::Player2, 1, 9, 0.5);
        assert_eq!(hit.player2_hp, vec![2, 0]);
        assert_eq!(hit.player1_hp, vec![3]);
        assert_eq!(hit.probability, 0.25);
        assert_eq!(base.player2_hp, vec![2, 5]);
    }

    #[test]
    fn empty_fleet_is_never_alive() {
        let s = state(&[], &[1], 1.0);
        assert!(!s.is_alive(Side::Player1));
        assert!(s.is_alive(Side::Player2));
        assert!(!s.ship_alive(Side::Player2, 4));
    }
}
