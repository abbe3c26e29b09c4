//! Static fleet configuration: weapons, ships and the two sides of a battle.
//! Nothing here changes during a simulation; current HP lives in [crate::combat::BattleState].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub damage: u32,
}

impl Weapon {
    pub const fn new(damage: u32) -> Self {
        Self { damage }
    }
}

/// Ship template. `health_points` is the starting HP and also the targeting key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub health_points: u32,
    pub initiative: u32,
    /// Non-positive; lowers the attacker's chance to hit.
    pub shield: i32,
    pub attack_modifier: u32,
    #[serde(default)]
    pub guns: Vec<Weapon>,
    #[serde(default)]
    pub missiles: Vec<Weapon>,
}

impl Ship {
    /// Ship with the editor defaults: initiative 1, no shield, no attack bonus, unarmed.
    pub fn new(health_points: u32) -> Self {
        Self {
            health_points,
            initiative: 1,
            shield: 0,
            attack_modifier: 0,
            guns: Vec::new(),
            missiles: Vec::new(),
        }
    }

    pub fn with_initiative(mut self, initiative: u32) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn with_shield(mut self, shield: i32) -> Self {
        self.shield = shield;
        self
    }

    pub fn with_attack_modifier(mut self, attack_modifier: u32) -> Self {
        self.attack_modifier = attack_modifier;
        self
    }

    pub fn with_gun(mut self, damage: u32) -> Self {
        self.guns.push(Weapon::new(damage));
        self
    }

    pub fn with_missile(mut self, damage: u32) -> Self {
        self.missiles.push(Weapon::new(damage));
        self
    }

    /// Number of dice this ship rolls in one full turn.
    pub fn weapon_count(&self) -> usize {
        self.guns.len() + self.missiles.len()
    }
}

/// Ordered ships of one player. Indices are stable for the whole battle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fleet {
    pub ships: Vec<Ship>,
}

impl Fleet {
    pub fn new(ships: Vec<Ship>) -> Self {
        Self { ships }
    }

    pub fn single(ship: Ship) -> Self {
        Self { ships: vec![ship] }
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn starting_hp(&self) -> Vec<u32> {
        self.ships.iter().map(|ship| ship.health_points).collect()
    }

    pub fn weapon_count(&self) -> usize {
        self.ships.iter().map(Ship::weapon_count).sum()
    }
}

/// Which player a ship or state vector belongs to. Player 1 sorts first, which is
/// what breaks initiative ties in its favour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::Player1 => 1,
            Self::Player2 => 2,
        }
    }
}
