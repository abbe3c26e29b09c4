//! Round executor: initiative order, then missiles and guns for each living ship.

use crate::combat::fleet::{Fleet, Side};
use crate::combat::phase::{execute_guns_phase, execute_missile_phase};
use crate::combat::state::{BattleState, Distribution};

/// One ship's place in the turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnSlot {
    pub side: Side,
    pub ship_index: usize,
    pub initiative: u32,
}

/// Ships alive in `state`, highest initiative first; player 1 before player 2 on
/// equal initiative, fleet order within a side.
pub fn turn_order(state: &BattleState, player1: &Fleet, player2: &Fleet) -> Vec<TurnSlot> {
    let mut slots: Vec<TurnSlot> = [(Side::Player1, player1), (Side::Player2, player2)]
        .into_iter()
        .flat_map(|(side, fleet)| {
            fleet
                .ships
                .iter()
                .enumerate()
                .filter(move |(index, _)| state.ship_alive(side, *index))
                .map(move |(ship_index, ship)| TurnSlot {
                    side,
                    ship_index,
                    initiative: ship.initiative,
                })
        })
        .collect();

    // stable: fleet order survives the sort
    slots.sort_by(|a, b| {
        b.initiative
            .cmp(&a.initiative)
            .then_with(|| a.side.cmp(&b.side))
    });
    slots
}

fn fleet_for<'a>(side: Side, player1: &'a Fleet, player2: &'a Fleet) -> &'a Fleet {
    match side {
        Side::Player1 => player1,
        Side::Player2 => player2,
    }
}

/// Play one full round from `state`. The turn order is fixed from the round's
/// starting alive-set, but liveness is checked again per branch right before each
/// ship acts. The output is not merged.
pub fn execute_round(state: &BattleState, player1: &Fleet, player2: &Fleet) -> Distribution {
    let order = turn_order(state, player1, player2);
    let mut current: Distribution = vec![BattleState {
        probability: 1.0,
        ..state.clone()
    }];

    for slot in order {
        let ship = &fleet_for(slot.side, player1, player2).ships[slot.ship_index];
        let defending = fleet_for(slot.side.opponent(), player1, player2);
        let mut next = Vec::with_capacity(current.len());

        for branch in current {
            if !branch.ship_alive(slot.side, slot.ship_index) {
                next.push(branch);
                continue;
            }
            let after_missiles = execute_missile_phase(vec![branch], ship, defending, slot.side);
            next.extend(execute_guns_phase(after_missiles, ship, defending, slot.side));
        }

        current = next;
    }

    current
}
