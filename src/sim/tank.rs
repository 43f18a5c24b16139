//! A player-controlled tank
//!
//! Works in the unscaled 800x320 reference space; `render` is the only place
//! the pixel ratio appears. `x_pos`/`y_pos` are the left edge and the ground
//! line, so the body occupies `[x, x + W] x [y - H, y]`.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::magazine::Magazine;
use super::projectile::Projectile;
use crate::consts::{
    FIELD_WIDTH, STARTING_HEALTH, TANK_GUN_LENGTH, TANK_GUN_WIDTH, TANK_HEIGHT, TANK_WIDTH,
};
use crate::players::PlayerStats;
use crate::render::DrawSurface;

/// A horizontal `[left, right)` span another object occupies; used for
/// movement validation.
pub type XSpan = (f32, f32);

#[derive(Debug, Clone)]
pub struct Tank {
    player: PlayerStats,
    health: i32,
    pos: Vec2,
    /// Degrees; 0 is straight up, clamped to [-90, 90]
    gun_angle: f32,
    magazine: Magazine,
    last_launch_power: f32,
}

impl Tank {
    pub fn new(player: PlayerStats) -> Self {
        Self {
            player,
            health: STARTING_HEALTH,
            pos: Vec2::ZERO,
            gun_angle: 0.0,
            magazine: Magazine::new(3, 3),
            last_launch_power: crate::consts::DEFAULT_LAUNCH_POWER,
        }
    }

    pub fn id(&self) -> u32 {
        self.player.id
    }

    pub fn name(&self) -> &str {
        &self.player.name
    }

    /// The tank's copy of its player record, with the damage/kill counters
    /// accumulated so far this match.
    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn x_pos(&self) -> f32 {
        self.pos.x
    }

    pub fn y_pos(&self) -> f32 {
        self.pos.y
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Horizontal span the body occupies
    pub fn x_span(&self) -> XSpan {
        (self.pos.x, self.pos.x + TANK_WIDTH)
    }

    pub fn gun_angle(&self) -> f32 {
        self.gun_angle
    }

    pub fn last_launch_power(&self) -> f32 {
        self.last_launch_power
    }

    pub fn magazine(&self) -> &Magazine {
        &self.magazine
    }

    pub fn cycle_ammo_next(&mut self) {
        self.magazine.cycle_next();
    }

    pub fn cycle_ammo_prev(&mut self) {
        self.magazine.cycle_prev();
    }

    /// Applies damage and reports whether this hit dropped health to zero.
    /// The caller must check `is_alive` before applying splash so a dead
    /// tank cannot yield a second kill credit.
    pub fn receive_damage(&mut self, dmg: i32) -> bool {
        self.health -= dmg;
        self.player.dmg_received += dmg;
        if self.health <= 0 {
            self.health = 0;
            return true;
        }
        false
    }

    pub fn add_kill(&mut self) {
        self.player.kills += 1;
    }

    pub fn change_damage_dealt(&mut self, diff: i32) {
        self.player.dmg_dealt += diff;
    }

    /// Marks the final outcome on the player record at match end.
    pub fn record_outcome(&mut self, won: bool) {
        if won {
            self.player.wins = 1;
        } else {
            self.player.loses = 1;
        }
    }

    /// Rotates the gun, clamped to [-90, 90] degrees.
    pub fn move_gun(&mut self, angle_diff: f32) {
        self.gun_angle = (self.gun_angle + angle_diff).clamp(-90.0, 90.0);
    }

    /// Tries to shift the tank horizontally. The move is all-or-nothing:
    /// applied only if the moved body overlaps no blocker span and stays
    /// fully on the field. Returns whether it was applied.
    pub fn attempt_move(&mut self, dx: f32, blockers: &[XSpan]) -> bool {
        let new_left = self.pos.x + dx;
        let new_right = new_left + TANK_WIDTH;
        let clear = blockers
            .iter()
            .all(|&(left, right)| new_right <= left || new_left >= right);
        if clear && new_left >= 0.0 && new_right < FIELD_WIDTH {
            self.pos.x = new_left;
            return true;
        }
        false
    }

    /// Fires the currently selected ammo. Shells start at the muzzle point
    /// and inherit the gun angle; power is remembered so the HUD slider can
    /// be restored on the tank's next turn.
    pub fn fire(&mut self, power: f32, rng: &mut Pcg32) -> Vec<Projectile> {
        self.last_launch_power = power;
        let muzzle = self.gun_end();
        let mut shells = self.magazine.take_round(self.player.id, rng);
        for shell in &mut shells {
            shell.launch(muzzle, self.gun_angle, power);
        }
        shells
    }

    /// Muzzle point, offset from the turret by a bit more than the gun
    /// length so shells never spawn inside the body.
    fn gun_end(&self) -> Vec2 {
        let angle = self.gun_angle.to_radians();
        Vec2::new(
            self.pos.x + TANK_WIDTH / 2.0 + angle.sin() * TANK_GUN_LENGTH * 1.1,
            self.pos.y - TANK_HEIGHT - angle.cos() * TANK_GUN_LENGTH * 1.1,
        )
    }

    /// Axis-aligned body test against the shell's center +- radius.
    pub fn is_collision(&self, p: &Projectile) -> bool {
        p.y_pos() + p.radius() > self.pos.y - TANK_HEIGHT
            && p.y_pos() - p.radius() < self.pos.y
            && p.x_pos() + p.radius() > self.pos.x
            && p.x_pos() - p.radius() < self.pos.x + TANK_WIDTH
    }

    /// Distance between the body center and the shell center.
    pub fn center_distance(&self, p: &Projectile) -> f32 {
        let center = Vec2::new(
            self.pos.x + TANK_WIDTH / 2.0,
            self.pos.y - TANK_HEIGHT / 2.0,
        );
        crate::euclidean_distance(center, p.position())
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ratio: f32) {
        // Gun first so the body covers its root
        let pivot = Vec2::new(
            (self.pos.x + TANK_WIDTH / 2.0) * ratio,
            (self.pos.y - TANK_HEIGHT) * ratio,
        );
        let angle = self.gun_angle.to_radians();
        let tip = pivot + Vec2::new(angle.sin(), -angle.cos()) * TANK_GUN_LENGTH * ratio;
        surface.stroke_line(
            pivot.x,
            pivot.y,
            tip.x,
            tip.y,
            TANK_GUN_WIDTH * ratio,
            self.player.color,
        );
        surface.fill_rect(
            self.pos.x * ratio,
            (self.pos.y - TANK_HEIGHT) * ratio,
            TANK_WIDTH * ratio,
            TANK_HEIGHT * ratio,
            self.player.color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::PlayerStats;
    use crate::sim::projectile::ProjectileStats;
    use rand::SeedableRng;

    fn tank_at(x: f32) -> Tank {
        let mut tank = Tank::new(PlayerStats::new_empty(1, "Test"));
        tank.set_position(Vec2::new(x, 300.0));
        tank
    }

    fn shell_at(x: f32, y: f32) -> Projectile {
        let stats = ProjectileStats {
            radius: 2.0,
            speed: 1.0,
            explosion_radius: 25.0,
            damage: 11,
            mass: 5.0,
        };
        let mut p = Projectile::new(9, stats, 0.0);
        p.launch(Vec2::new(x, y), 0.0, 10.0);
        p
    }

    #[test]
    fn test_gun_angle_clamps() {
        let mut tank = tank_at(100.0);
        tank.move_gun(500.0);
        assert_eq!(tank.gun_angle(), 90.0);
        tank.move_gun(-1000.0);
        assert_eq!(tank.gun_angle(), -90.0);
    }

    #[test]
    fn test_receive_damage_clamps_and_reports_death() {
        let mut tank = tank_at(100.0);
        assert!(!tank.receive_damage(11));
        assert_eq!(tank.health(), 9);
        assert!(tank.receive_damage(23));
        assert_eq!(tank.health(), 0);
        assert!(!tank.is_alive());
        assert_eq!(tank.player().dmg_received, 34);
    }

    #[test]
    fn test_attempt_move_is_all_or_nothing() {
        let mut tank = tank_at(100.0);
        // Another tank's body sits right in the path
        let blocker = (120.0, 150.0);
        assert!(!tank.attempt_move(10.0, &[blocker]));
        assert_eq!(tank.x_pos(), 100.0);
        // Away from it is fine
        assert!(tank.attempt_move(-10.0, &[blocker]));
        assert_eq!(tank.x_pos(), 90.0);
    }

    #[test]
    fn test_attempt_move_respects_field_edges() {
        let mut tank = tank_at(5.0);
        assert!(!tank.attempt_move(-10.0, &[]));
        assert_eq!(tank.x_pos(), 5.0);

        let mut tank = tank_at(760.0);
        assert!(!tank.attempt_move(15.0, &[]));
    }

    #[test]
    fn test_fire_records_power_and_launches_from_muzzle() {
        let mut tank = tank_at(400.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let shells = tank.fire(80.0, &mut rng);
        assert_eq!(shells.len(), 1);
        assert_eq!(tank.last_launch_power(), 80.0);
        // Gun points straight up: shell starts centered above the turret
        assert!((shells[0].x_pos() - (400.0 + TANK_WIDTH / 2.0)).abs() < 1e-3);
        assert!(shells[0].y_pos() < 300.0 - TANK_HEIGHT);
    }

    #[test]
    fn test_projectile_collision_aabb() {
        let tank = tank_at(100.0);
        assert!(tank.is_collision(&shell_at(110.0, 295.0)));
        assert!(!tank.is_collision(&shell_at(200.0, 295.0)));
        assert!(!tank.is_collision(&shell_at(110.0, 200.0)));
    }
}
