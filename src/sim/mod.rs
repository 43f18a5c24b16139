//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by turn priority)
//! - No rendering or platform dependencies

pub mod explosion;
pub mod magazine;
pub mod obstacle;
pub mod projectile;
pub mod state;
pub mod tank;
pub mod tick;

pub use explosion::{AnimationRate, Explosion};
pub use magazine::{AmmoKind, Magazine, LARGEST_PROJECTILE_DAMAGE};
pub use obstacle::{Column, Obstacle};
pub use projectile::{Projectile, ProjectileStats};
pub use state::{GameEvent, MatchPhase, MatchState};
pub use tank::{Tank, XSpan};
pub use tick::{TickInput, tick};
