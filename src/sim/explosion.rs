//! Explosion burst animation
//!
//! Purely cosmetic, but the turn engine waits for it: the next turn starts
//! only after every burst has played out.

use glam::Vec2;

use crate::render::{Color, DrawSurface};

struct Ring {
    r: f32,
    color: Color,
}

/// Concentric rings per animation step, inner rings drawn last.
const ANIMATION_STEPS: [&[Ring]; 5] = [
    &[Ring { r: 1.0, color: Color::YELLOW }],
    &[Ring { r: 2.0, color: Color::YELLOW }],
    &[
        Ring { r: 3.0, color: Color::ORANGE },
        Ring { r: 2.0, color: Color::YELLOW },
    ],
    &[
        Ring { r: 4.0, color: Color::RED },
        Ring { r: 3.5, color: Color::ORANGE },
        Ring { r: 2.0, color: Color::YELLOW },
    ],
    &[Ring { r: 1.0, color: Color::ORANGE }],
];

/// How fast an explosion steps through its animation per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationRate {
    /// Tank-death blast, lingers
    Slow,
    /// Shell burst
    Fast,
}

impl AnimationRate {
    fn step(self) -> f32 {
        match self {
            AnimationRate::Slow => 0.2,
            AnimationRate::Fast => 0.5,
        }
    }
}

/// One explosion burst at a fixed point.
#[derive(Debug, Clone)]
pub struct Explosion {
    center: Vec2,
    /// Base ring radius (a fifth of the blast radius)
    radius: f32,
    t: f32,
    rate: AnimationRate,
}

impl Explosion {
    pub fn new(center: Vec2, radius: f32, rate: AnimationRate) -> Self {
        Self {
            center,
            radius: radius / 5.0,
            t: 0.0,
            rate,
        }
    }

    /// True while there are animation steps left to show.
    pub fn is_animating(&self) -> bool {
        self.t < ANIMATION_STEPS.len() as f32
    }

    /// Advances to the next animation frame.
    pub fn animate(&mut self) {
        self.t += self.rate.step();
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ratio: f32) {
        let Some(step) = ANIMATION_STEPS.get(self.t as usize) else {
            return;
        };
        for ring in *step {
            surface.fill_circle(
                self.center.x * ratio,
                self.center.y * ratio,
                self.radius * ring.r * ratio,
                ring.color,
            );
        }
    }
}
