//! Match state and turn bookkeeping
//!
//! All state that must be persisted for determinism lives here: the roster,
//! in-flight shells, obstacles, explosion visuals, wind and the seeded RNG.
//! The per-tick procedure itself is in [`super::tick`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::explosion::Explosion;
use super::obstacle::Obstacle;
use super::projectile::Projectile;
use super::tank::Tank;
use crate::consts::*;
use crate::players::PlayerStats;
use crate::render::DrawSurface;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// The active tank takes input: move, aim, fire
    Aiming,
    /// Shells in flight or animations playing; input locked
    Resolving,
    /// Match ended, results available
    Over,
}

/// Fire-and-forget notifications for the host (audio, HUD).
///
/// Drained via [`MatchState::drain_events`]; an unconsumed queue never
/// affects the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ShotFired { tank_id: u32 },
    ShellExploded { x: f32, y: f32 },
    TankDestroyed { tank_id: u32 },
    TurnStarted { tank_id: u32, round: u32 },
    MatchOver { winner_id: Option<u32> },
}

/// One slot of the initial field layout
#[derive(Debug, Clone, Copy)]
enum Slot {
    Tank(usize),
    Obstacle,
}

/// Field layouts for 2, 3 and 4 players: tanks and obstacles alternate,
/// each centered in a slot of width `FIELD_WIDTH / slots`.
const LAYOUTS: [&[Slot]; 3] = [
    &[Slot::Tank(0), Slot::Obstacle, Slot::Obstacle, Slot::Tank(1)],
    &[
        Slot::Tank(0),
        Slot::Obstacle,
        Slot::Tank(1),
        Slot::Obstacle,
        Slot::Tank(2),
    ],
    &[
        Slot::Tank(0),
        Slot::Obstacle,
        Slot::Tank(1),
        Slot::Obstacle,
        Slot::Tank(2),
        Slot::Obstacle,
        Slot::Tank(3),
    ],
];

/// Complete match state (deterministic given the seed and the input stream)
#[derive(Debug, Clone)]
pub struct MatchState {
    pub tanks: Vec<Tank>,
    /// Index of the tank whose turn it is
    pub cur_idx: usize,
    pub projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub explosions: Vec<Explosion>,
    /// Positive blows right, negative left
    pub wind: f32,
    /// Increments when the turn order wraps around the roster
    pub round: u32,
    pub phase: MatchPhase,
    pub rng: Pcg32,
    pub(super) events: Vec<GameEvent>,
}

impl MatchState {
    /// Creates a match for 2 to 4 players on a freshly generated field.
    pub fn new(players: Vec<PlayerStats>, seed: u64) -> Self {
        debug_assert!(
            (2..=4).contains(&players.len()),
            "a match takes 2 to 4 players"
        );
        let mut rng = Pcg32::seed_from_u64(seed);
        let wind = rng.random_range(-50.0..50.0);

        let mut tanks: Vec<Tank> = players.into_iter().map(Tank::new).collect();
        let mut obstacles = Vec::new();
        let layout = LAYOUTS[tanks.len() - 2];
        let distance = FIELD_WIDTH / layout.len() as f32;
        for (i, slot) in layout.iter().enumerate() {
            let center = distance * (i as f32 + 0.5);
            match slot {
                Slot::Obstacle => {
                    obstacles.push(Obstacle::random(center, GROUND_START, &mut rng));
                }
                Slot::Tank(t) => {
                    tanks[*t].set_position(Vec2::new(center - TANK_WIDTH / 2.0, GROUND_START));
                }
            }
        }

        log::info!(
            "Starting match: {} tanks, wind {:.1}",
            tanks.len(),
            wind
        );
        let first_turn = GameEvent::TurnStarted {
            tank_id: tanks[0].id(),
            round: 1,
        };
        Self {
            tanks,
            cur_idx: 0,
            projectiles: Vec::new(),
            obstacles,
            explosions: Vec::new(),
            wind,
            round: 1,
            phase: MatchPhase::Aiming,
            rng,
            events: vec![first_turn],
        }
    }

    /// The tank whose turn it is
    pub fn cur_tank(&self) -> &Tank {
        &self.tanks[self.cur_idx]
    }

    pub fn cur_tank_mut(&mut self) -> &mut Tank {
        &mut self.tanks[self.cur_idx]
    }

    /// Selects the next ammo kind for the active tank (no-op while resolving).
    pub fn cycle_ammo_next(&mut self) {
        if self.phase == MatchPhase::Aiming {
            self.cur_tank_mut().cycle_ammo_next();
        }
    }

    pub fn cycle_ammo_prev(&mut self) {
        if self.phase == MatchPhase::Aiming {
            self.cur_tank_mut().cycle_ammo_prev();
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::Over
    }

    /// True while a settle collapse or explosion visual is playing.
    pub fn is_animating(&self) -> bool {
        self.obstacles.iter().any(|o| o.is_animating())
            || self.explosions.iter().any(|e| e.is_animating())
    }

    /// Takes the pending host notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The roster with its per-match counters; after the match ended every
    /// record carries its win/loss annotation.
    pub fn results(&self) -> Vec<PlayerStats> {
        self.tanks.iter().map(|t| t.player().clone()).collect()
    }

    /// Renders the whole scene: ground band, shells, tanks, obstacles and
    /// explosion visuals.
    pub fn render(&self, surface: &mut dyn DrawSurface, ratio: f32) {
        surface.fill_rect(
            0.0,
            GROUND_START * ratio,
            FIELD_WIDTH * ratio,
            GROUND_HEIGHT * ratio,
            crate::render::Color::GROUND_GREEN,
        );
        for p in &self.projectiles {
            p.render(surface, ratio);
        }
        for t in &self.tanks {
            t.render(surface, ratio);
        }
        for o in &self.obstacles {
            o.render(surface, ratio);
        }
        for e in &self.explosions {
            e.render(surface, ratio);
        }
    }
}
