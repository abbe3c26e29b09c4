//! Phase executor: every weapon of one category on one ship, fired in order.

use crate::combat::fleet::{Fleet, Ship, Side, Weapon};
use crate::combat::state::Distribution;
use crate::combat::weapon::fire_weapon;

/// Fold [fire_weapon] over `weapons`; the output of shot `i` feeds shot `i + 1`.
pub fn execute_phase(
    states: Distribution,
    attacking_ship: &Ship,
    weapons: &[Weapon],
    defending: &Fleet,
    attacker: Side,
) -> Distribution {
    weapons.iter().fold(states, |states, weapon| {
        fire_weapon(
            states,
            attacking_ship.attack_modifier,
            weapon.damage,
            defending,
            attacker,
        )
    })
}

pub fn execute_missile_phase(
    states: Distribution,
    attacking_ship: &Ship,
    defending: &Fleet,
    attacker: Side,
) -> Distribution {
    execute_phase(states, attacking_ship, &attacking_ship.missiles, defending, attacker)
}

pub fn execute_guns_phase(
    states: Distribution,
    attacking_ship: &Ship,
    defending: &Fleet,
    attacker: Side,
) -> Distribution {
    execute_phase(states, attacking_ship, &attacking_ship.guns, defending, attacker)
}
