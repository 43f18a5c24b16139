//! Ballistic state of a fired shell
//!
//! Positions are closed-form in the tick counter rather than integrated, so a
//! shell's arc is exact regardless of how it got sampled. Wind is the
//! exception: its drift accumulates tick by tick and only shifts the
//! displayed/collision x, never the arc itself.

use glam::Vec2;

use crate::render::{Color, DrawSurface};

/// Fixed ballistic stats of one ammo kind. Every shell carries its own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileStats {
    pub radius: f32,
    /// Base speed coefficient, scaled by launch power at fire time
    pub speed: f32,
    pub explosion_radius: f32,
    pub damage: i32,
    /// Heavier shells drift less in wind
    pub mass: f32,
}

/// A shell in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    /// Id of the tank that fired this shell (looked up, not owned)
    origin_id: u32,
    stats: ProjectileStats,
    /// Per-shot deviation in degrees, used by scatter ammo
    angle_err: f32,

    exploded: bool,
    /// Integer ticks since launch
    t: u32,
    /// Effective speed after the power multiplier
    speed: f32,
    origin: Vec2,
    pos: Vec2,
    angle_cos: f32,
    angle_sin: f32,
    /// Accumulated wind drift, applied to the displayed x only
    wind_x_diff: f32,
}

impl Projectile {
    pub fn new(origin_id: u32, stats: ProjectileStats, angle_err: f32) -> Self {
        Self {
            origin_id,
            stats,
            angle_err,
            exploded: false,
            t: 0,
            speed: stats.speed,
            origin: Vec2::ZERO,
            pos: Vec2::ZERO,
            angle_cos: 0.0,
            angle_sin: 0.0,
            wind_x_diff: 0.0,
        }
    }

    /// Displayed/collision x position (wind drift included)
    pub fn x_pos(&self) -> f32 {
        self.pos.x + self.wind_x_diff
    }

    pub fn y_pos(&self) -> f32 {
        self.pos.y
    }

    /// Display position as a vector
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x_pos(), self.y_pos())
    }

    pub fn origin_id(&self) -> u32 {
        self.origin_id
    }

    pub fn radius(&self) -> f32 {
        self.stats.radius
    }

    pub fn explosion_radius(&self) -> f32 {
        self.stats.explosion_radius
    }

    pub fn damage(&self) -> i32 {
        self.stats.damage
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    /// One-way transition; an exploded shell takes no further collisions.
    pub fn explode(&mut self) {
        self.exploded = true;
    }

    /// Launches the shell from the given point at the given gun angle.
    ///
    /// The angle convention is the gun's: 0 means straight up, -90 horizontal
    /// left, 90 horizontal right. Power is expected in 10..=100 and scales
    /// the ammo's base speed. The asymmetric remap below is load-bearing: the
    /// gravity and wind terms depend on exactly these components, so it must
    /// not be collapsed into a single sin/cos pair.
    pub fn launch(&mut self, from: Vec2, angle: f32, power: f32) {
        self.origin = from;
        self.pos = from;
        self.speed = self.stats.speed * power / 10.0;
        let mut angle = angle + self.angle_err;
        if angle < 0.0 {
            angle += 90.0;
            self.angle_cos = -angle.to_radians().cos();
        } else {
            angle = 90.0 - angle;
            self.angle_cos = angle.to_radians().cos();
        }
        self.angle_sin = angle.to_radians().sin();
        self.t = 0;
        self.wind_x_diff = 0.0;
    }

    /// Advances one tick: recomputes the arc position and accumulates wind
    /// drift. Drift grows with the log of flight time and is damped by the
    /// current frame displacement and the shell's mass.
    pub fn advance(&mut self, wind: f32) {
        self.t += 1;
        let t = self.t as f32;
        let prev = self.pos;

        self.pos.x = self.origin.x + self.speed * t * self.angle_cos;
        self.pos.y = self.origin.y - self.speed * t * self.angle_sin + t * t / 20.0;

        let diff = prev.distance(self.pos) + 10.0;
        self.wind_x_diff += wind * t.ln() / (diff * self.stats.mass);
    }

    /// True while the shell may still matter: it has not fallen below the
    /// floor and, if it left a side, the wind is not pushing it further out.
    pub fn can_return_to_range(&self, min_x: f32, max_x: f32, max_y: f32) -> bool {
        if self.pos.y > max_y {
            return false;
        }
        if self.pos.x < min_x && self.wind_x_diff < 0.0 {
            return false;
        }
        if self.pos.x > max_x && self.wind_x_diff > 0.0 {
            return false;
        }
        true
    }

    /// True if the whole shell is inside the given rectangle.
    pub fn is_in_range(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> bool {
        self.x_pos() + self.radius() > min_x
            && self.x_pos() - self.radius() < max_x
            && self.y_pos() + self.radius() > min_y
            && self.y_pos() - self.radius() < max_y
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ratio: f32) {
        surface.fill_circle(
            self.x_pos() * ratio,
            self.y_pos() * ratio,
            self.radius() * ratio,
            Color::BLACK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STANDARD: ProjectileStats = ProjectileStats {
        radius: 2.0,
        speed: 1.0,
        explosion_radius: 25.0,
        damage: 11,
        mass: 5.0,
    };

    fn launched(angle: f32, power: f32) -> Projectile {
        let mut p = Projectile::new(1, STANDARD, 0.0);
        p.launch(Vec2::new(400.0, 280.0), angle, power);
        p
    }

    #[test]
    fn test_angle_remap_straight_up() {
        let mut p = launched(0.0, 50.0);
        p.advance(0.0);
        // Straight up: no horizontal motion, shell rises (y shrinks)
        assert!((p.x_pos() - 400.0).abs() < 1e-3);
        assert!(p.y_pos() < 280.0);
    }

    #[test]
    fn test_angle_remap_horizontal() {
        let mut right = launched(90.0, 50.0);
        right.advance(0.0);
        assert!(right.x_pos() > 400.0);

        let mut left = launched(-90.0, 50.0);
        left.advance(0.0);
        assert!(left.x_pos() < 400.0);
    }

    #[test]
    fn test_descends_monotonically_after_apex() {
        let mut p = launched(30.0, 80.0);
        let mut prev_y = p.y_pos();
        let mut past_apex = false;
        for _ in 0..600 {
            p.advance(0.0);
            if past_apex {
                assert!(p.y_pos() > prev_y, "shell rose again after the apex");
            } else if p.y_pos() > prev_y {
                past_apex = true;
            }
            prev_y = p.y_pos();
        }
        assert!(past_apex, "shell never reached an apex");
    }

    #[test]
    fn test_wind_drift_is_path_dependent() {
        // Same total wind over two ticks, applied differently, must not
        // produce the same drift: the log-time damping makes it path
        // dependent.
        let mut steady = launched(45.0, 50.0);
        steady.advance(5.0);
        steady.advance(5.0);

        let mut front_loaded = launched(45.0, 50.0);
        front_loaded.advance(10.0);
        front_loaded.advance(0.0);

        assert!((steady.x_pos() - front_loaded.x_pos()).abs() > 1e-6);
    }

    #[test]
    fn test_cull_only_when_wind_pushes_out() {
        let mut p = launched(-90.0, 100.0);
        // Drive it past the left edge with a leftward wind
        for _ in 0..200 {
            p.advance(-20.0);
        }
        assert!(p.pos.x < 0.0);
        assert!(!p.can_return_to_range(0.0, 800.0, 320.0));

        // Same exit, but the wind blows back in: keep tracking it
        let mut p = launched(-90.0, 100.0);
        for _ in 0..200 {
            p.advance(20.0);
        }
        if p.pos.x < 0.0 {
            assert!(p.can_return_to_range(0.0, 800.0, 320.0));
        }
    }

    #[test]
    fn test_fallen_below_floor_never_returns() {
        let mut p = launched(10.0, 20.0);
        for _ in 0..2000 {
            p.advance(0.0);
        }
        assert!(p.y_pos() > 320.0);
        assert!(!p.can_return_to_range(0.0, 800.0, 320.0));
    }

    proptest! {
        /// Parabolic sanity over the whole valid input space: with no wind
        /// the vertical displacement increases every tick once the shell has
        /// started falling.
        #[test]
        fn prop_parabolic_descent(angle in -90.0_f32..=90.0, power in 10.0_f32..=100.0) {
            let mut p = launched(angle, power);
            let mut prev_y = p.y_pos();
            let mut falling = false;
            for _ in 0..1000 {
                p.advance(0.0);
                if falling {
                    prop_assert!(p.y_pos() > prev_y);
                } else if p.y_pos() > prev_y {
                    falling = true;
                }
                prev_y = p.y_pos();
            }
            prop_assert!(falling);
        }

        /// Wind never changes the true arc, only the displayed x.
        #[test]
        fn prop_wind_leaves_arc_untouched(wind in -50.0_f32..=50.0) {
            let mut windy = launched(30.0, 60.0);
            let mut calm = launched(30.0, 60.0);
            for _ in 0..120 {
                windy.advance(wind);
                calm.advance(0.0);
                prop_assert!((windy.y_pos() - calm.y_pos()).abs() < 1e-4);
                prop_assert!((windy.pos.x - calm.pos.x).abs() < 1e-4);
            }
        }
    }
}
