//! Per-tank ammunition inventory
//!
//! Three ammo kinds with fixed ballistic stats; Standard is unlimited, the
//! special kinds carry a per-match count. The selection cursor never rests on
//! an exhausted kind.

use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::projectile::{Projectile, ProjectileStats};
use crate::mod_floor;

/// The closed set of ammo kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmoKind {
    Standard,
    Big,
    Multi,
}

const AMMO_KINDS: [AmmoKind; 3] = [AmmoKind::Standard, AmmoKind::Big, AmmoKind::Multi];

struct AmmoInfo {
    name: &'static str,
    description: &'static str,
    stats: ProjectileStats,
}

const AMMO_INFOS: [AmmoInfo; 3] = [
    AmmoInfo {
        name: "Standard",
        description: "Standard ammo",
        stats: ProjectileStats {
            radius: 2.0,
            speed: 1.0,
            explosion_radius: 25.0,
            damage: 11,
            mass: 5.0,
        },
    },
    AmmoInfo {
        name: "Big",
        description: "Short range, big dmg",
        stats: ProjectileStats {
            radius: 3.0,
            speed: 0.5,
            explosion_radius: 35.0,
            damage: 23,
            mass: 15.0,
        },
    },
    AmmoInfo {
        name: "Multi",
        description: "5 shots at once",
        stats: ProjectileStats {
            radius: 1.0,
            speed: 0.8,
            explosion_radius: 23.0,
            damage: 5,
            mass: 5.0,
        },
    },
];

/// Scatter shot fires this many shells at once
const MULTI_COUNT: usize = 5;
/// Preset angular deviations scatter shells are drawn from (degrees)
const MULTI_ANGLE_ERRORS: [f32; 11] = [
    -11.0, -9.0, -7.0, -5.0, -3.0, 0.0, 3.0, 5.0, 7.0, 9.0, 11.0,
];

/// Largest single-shell damage of any ammo kind
pub const LARGEST_PROJECTILE_DAMAGE: i32 = 23;

/// Tank magazine with a selection cursor over the ammo kinds.
#[derive(Debug, Clone)]
pub struct Magazine {
    /// Remaining rounds per kind; `None` means unlimited
    remaining: [Option<u32>; 3],
    cur_index: usize,
}

impl Magazine {
    pub fn new(big: u32, multi: u32) -> Self {
        Self {
            remaining: [None, Some(big), Some(multi)],
            cur_index: 0,
        }
    }

    pub fn current_kind(&self) -> AmmoKind {
        AMMO_KINDS[self.cur_index]
    }

    /// Rounds left of the current kind (`None` for unlimited)
    pub fn current_remaining(&self) -> Option<u32> {
        self.remaining[self.cur_index]
    }

    /// Takes one round of the selected kind and builds its shells.
    ///
    /// Limited kinds are decremented first and the cursor auto-advances the
    /// moment the count reaches zero; the round already drawn still fires.
    /// Scatter ammo builds one shell per sampled deviation, all sharing the
    /// same base stats.
    pub fn take_round(&mut self, owner_id: u32, rng: &mut Pcg32) -> Vec<Projectile> {
        let kind = self.current_kind();
        if let Some(count) = &mut self.remaining[self.cur_index] {
            *count -= 1;
            if *count == 0 {
                self.cycle_next();
            }
        }
        match kind {
            AmmoKind::Standard => {
                vec![Projectile::new(owner_id, AMMO_INFOS[0].stats, 0.0)]
            }
            AmmoKind::Big => {
                vec![Projectile::new(owner_id, AMMO_INFOS[1].stats, 0.0)]
            }
            AmmoKind::Multi => MULTI_ANGLE_ERRORS
                .choose_multiple(rng, MULTI_COUNT)
                .map(|&err| Projectile::new(owner_id, AMMO_INFOS[2].stats, err))
                .collect(),
        }
    }

    /// Selects the next kind, skipping exhausted ones. The unlimited
    /// Standard slot guarantees this terminates.
    pub fn cycle_next(&mut self) {
        loop {
            self.cur_index = mod_floor(self.cur_index as i32 + 1, AMMO_KINDS.len() as i32) as usize;
            if self.remaining[self.cur_index] != Some(0) {
                break;
            }
        }
    }

    /// Selects the previous kind, skipping exhausted ones.
    pub fn cycle_prev(&mut self) {
        loop {
            self.cur_index = mod_floor(self.cur_index as i32 - 1, AMMO_KINDS.len() as i32) as usize;
            if self.remaining[self.cur_index] != Some(0) {
                break;
            }
        }
    }

    /// Short HUD label, e.g. `Big (3)`
    pub fn short_stats(&self) -> String {
        let info = &AMMO_INFOS[self.cur_index];
        match self.remaining[self.cur_index] {
            None => info.name.to_string(),
            Some(count) => format!("{} ({count})", info.name),
        }
    }

    /// Long HUD description of the current kind
    pub fn long_stats(&self) -> String {
        let info = &AMMO_INFOS[self.cur_index];
        format!(
            "{}\nDamage: {}\nSpeed coefficient: {}\nExplosion: {}",
            info.description, info.stats.damage, info.stats.speed, info.stats.explosion_radius
        )
    }
}
