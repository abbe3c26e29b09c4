//! Weapon resolver: one shot from one weapon, applied to every state of a distribution.

use crate::combat::dice::HitChance;
use crate::combat::fleet::{Fleet, Side};
use crate::combat::state::{BattleState, Distribution};

/// Index of the defender a shot goes to: the living ship with the greatest starting
/// HP, first in fleet order on ties. `None` when the defending side is wiped out.
pub fn select_target(state: &BattleState, defending: &Fleet, defender_side: Side) -> Option<usize> {
    let hp = state.hp(defender_side);
    let mut best: Option<(usize, u32)> = None;

    for (index, ship) in defending.ships.iter().enumerate() {
        if hp.get(index).copied().unwrap_or(0) == 0 {
            continue;
        }
        // strictly greater only: ties keep the earlier ship
        let larger = best.map_or(true, |(_, largest)| ship.health_points > largest);
        if larger {
            best = Some((index, ship.health_points));
        }
    }

    best.map(|(index, _)| index)
}

/// Fire one weapon of `damage` from a ship of `attacker` with `attack_modifier`.
/// Each input state yields a hit successor and a miss successor; states with no
/// living defender pass through untouched. No merging happens here.
pub fn fire_weapon(
    states: Distribution,
    attack_modifier: u32,
    damage: u32,
    defending: &Fleet,
    attacker: Side,
) -> Distribution {
    let defender_side = attacker.opponent();
    let mut results = Vec::with_capacity(states.len() * 2);

    for state in states {
        let Some(target) = select_target(&state, defending, defender_side) else {
            results.push(state);
            continue;
        };

        let chance = HitChance::new(attack_modifier, defending.ships[target].shield);
        if chance.can_hit() {
            results.push(state.damaged(defender_side, target, damage, chance.hit()));
        }
        if chance.can_miss() {
            results.push(state.scaled(chance.miss()));
        }
    }

    results
}
