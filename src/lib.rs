//! Tanks2D - a local multiplayer artillery game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ballistics, collisions, turn engine)
//! - `render`: Abstract drawing surface the host plugs a real canvas into
//! - `players`: Player records, standings and the storage repository

pub mod players;
pub mod render;
pub mod sim;

pub use players::{PlayerStats, PlayerStore};
pub use render::{Color, DrawSurface};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz nominal rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Reference playfield dimensions (world units)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 320.0;
    /// Top of the ground band; shells detonate on reaching it
    pub const GROUND_START: f32 = 300.0;
    pub const GROUND_HEIGHT: f32 = 20.0;

    /// Tank body and gun dimensions
    pub const TANK_WIDTH: f32 = 30.0;
    pub const TANK_HEIGHT: f32 = 15.0;
    pub const TANK_GUN_LENGTH: f32 = 15.0;
    pub const TANK_GUN_WIDTH: f32 = 4.0;

    /// Movement rates (world units per second / degrees per second)
    pub const TANK_MOVE_SPEED: f32 = 60.0;
    pub const GUN_MOVE_SPEED: f32 = 100.0;

    /// Launch power slider range
    pub const MIN_LAUNCH_POWER: f32 = 10.0;
    pub const MAX_LAUNCH_POWER: f32 = 100.0;
    pub const DEFAULT_LAUNCH_POWER: f32 = 50.0;

    /// Side of one destructible obstacle block
    pub const BLOCK_SIZE: f32 = 3.0;

    /// Every tank starts a match with this much health
    pub const STARTING_HEALTH: i32 = 20;
}

/// Modulo with a non-negative result for negative operands
/// (`%` in Rust follows the sign of the dividend).
#[inline]
pub fn mod_floor(n: i32, m: i32) -> i32 {
    ((n % m) + m) % m
}

/// Euclidean distance between two points
#[inline]
pub fn euclidean_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Floors the given value to whole hundreds
#[inline]
pub fn floor_to_hundred(x: f32) -> f32 {
    (x / 100.0).floor() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_floor_negative() {
        assert_eq!(mod_floor(-1, 3), 2);
        assert_eq!(mod_floor(-3, 3), 0);
        assert_eq!(mod_floor(4, 3), 1);
    }

    #[test]
    fn test_floor_to_hundred() {
        assert_eq!(floor_to_hundred(1234.0), 1200.0);
        assert_eq!(floor_to_hundred(99.0), 0.0);
    }
}
