//! Six-sided hit resolution. A shot hits when `d6 + attack_modifier + shield >= 6`,
//! i.e. when the roll reaches `6 - attack_modifier - shield`. The threshold is clamped
//! to `[MIN_THRESHOLD, MAX_THRESHOLD]`, so a 1 always misses and a 6 always hits.

pub const DIE_FACES: u32 = 6;
pub const MIN_THRESHOLD: i64 = 2;
pub const MAX_THRESHOLD: i64 = 6;

/// Minimum roll needed to hit, after clamping.
pub fn hit_threshold(attack_modifier: u32, shield: i32) -> u32 {
    let raw = i64::from(DIE_FACES) - i64::from(attack_modifier) - i64::from(shield);
    // Clamped into 2..=6, so the cast cannot truncate.
    raw.clamp(MIN_THRESHOLD, MAX_THRESHOLD) as u32
}

/// Faces of the die that score a hit against `threshold`.
pub fn favorable_faces(threshold: u32) -> u32 {
    (1..=DIE_FACES).filter(|roll| *roll >= threshold).count() as u32
}

/// Hit chance as an exact multiple of 1/6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitChance {
    pub favorable: u32,
}

impl HitChance {
    pub fn new(attack_modifier: u32, shield: i32) -> Self {
        Self {
            favorable: favorable_faces(hit_threshold(attack_modifier, shield)),
        }
    }

    pub fn can_hit(self) -> bool {
        self.favorable > 0
    }

    pub fn can_miss(self) -> bool {
        self.favorable < DIE_FACES
    }

    pub fn hit(self) -> f64 {
        f64::from(self.favorable) / f64::from(DIE_FACES)
    }

    pub fn miss(self) -> f64 {
        f64::from(DIE_FACES - self.favorable) / f64::from(DIE_FACES)
    }
}
