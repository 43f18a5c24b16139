//! Fixed timestep match tick
//!
//! One tick applies the active tank's input, advances ballistics, resolves
//! collisions and splash damage, and finally evaluates the turn transition
//! rules in fixed priority order.

use glam::Vec2;
use rand::Rng;

use super::explosion::{AnimationRate, Explosion};
use super::projectile::Projectile;
use super::state::{GameEvent, MatchPhase, MatchState};
use super::tank::XSpan;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Movement intent of the active tank, -1 left to +1 right
    pub movement: f32,
    /// Gun rotation intent, -1 towards left horizontal to +1 towards right
    pub gun_movement: f32,
    /// Fire was requested this tick
    pub fire: bool,
    /// Launch power slider value
    pub power: f32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            movement: 0.0,
            gun_movement: 0.0,
            fire: false,
            power: DEFAULT_LAUNCH_POWER,
        }
    }
}

/// Advances the match by one fixed timestep.
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    if state.phase == MatchPhase::Over {
        return;
    }

    if state.phase == MatchPhase::Aiming {
        apply_movement(state, input, dt);
    }

    let were_projectiles = !state.projectiles.is_empty();

    // Shells are taken out of the state so explosion resolution can mutate
    // tanks and obstacles while we walk them.
    let mut shells = std::mem::take(&mut state.projectiles);
    for p in &mut shells {
        p.advance(state.wind);
    }
    for p in &mut shells {
        if hits_something(state, p) {
            p.explode();
            resolve_explosion(state, p);
        }
    }
    shells.retain(|p| p.can_return_to_range(0.0, FIELD_WIDTH, FIELD_HEIGHT) && !p.is_exploded());
    state.projectiles = shells;

    state.obstacles.retain(|o| o.columns_count() > 0);
    state.explosions.retain(|e| e.is_animating());

    // Dead tanks are parked off the field but stay in the roster; the
    // results still need them.
    for tank in &mut state.tanks {
        if !tank.is_alive() {
            tank.set_position(Vec2::new(2.0 * FIELD_WIDTH, 2.0 * FIELD_HEIGHT));
        }
    }

    let was_animation = state.is_animating();
    for o in &mut state.obstacles {
        o.animate();
    }
    for e in &mut state.explosions {
        e.animate();
    }
    let is_animation = state.is_animating();

    // Turn transition rules, in fixed priority order
    let alive = state.tanks.iter().filter(|t| t.is_alive()).count();
    if state.phase == MatchPhase::Aiming && input.fire {
        fire(state, input.power);
    } else if !is_animation && alive < 2 {
        end_match(state);
    } else if state.projectiles.is_empty() && were_projectiles && !is_animation {
        next_turn(state);
    } else if !is_animation && was_animation && state.projectiles.is_empty() {
        next_turn(state);
    }
}

/// Applies the active tank's movement and aim intents, dt-scaled.
fn apply_movement(state: &mut MatchState, input: &TickInput, dt: f32) {
    if input.movement != 0.0 {
        let dx = input.movement.clamp(-1.0, 1.0) * TANK_MOVE_SPEED * dt;
        let blockers: Vec<XSpan> = state
            .tanks
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != state.cur_idx)
            .map(|(_, t)| t.x_span())
            .chain(state.obstacles.iter().map(|o| o.x_span()))
            .collect();
        state.tanks[state.cur_idx].attempt_move(dx, &blockers);
    }
    if input.gun_movement != 0.0 {
        let da = input.gun_movement.clamp(-1.0, 1.0) * GUN_MOVE_SPEED * dt;
        state.cur_tank_mut().move_gun(da);
    }
}

/// True if the shell hit the ground band, a tank or an obstacle this tick.
fn hits_something(state: &MatchState, p: &Projectile) -> bool {
    p.y_pos() + p.radius() > GROUND_START
        || state.tanks.iter().any(|t| t.is_collision(p))
        || state.obstacles.iter().any(|o| o.is_collision(p))
}

/// Detonates the shell: damages every living tank in the blast radius,
/// credits the shooter, carves the obstacles and spawns the burst visuals.
fn resolve_explosion(state: &mut MatchState, p: &Projectile) {
    state.events.push(GameEvent::ShellExploded {
        x: p.x_pos(),
        y: p.y_pos(),
    });

    let origin_idx = state.tanks.iter().position(|t| t.id() == p.origin_id());
    let mut kills = 0;
    let mut damage_dealt = 0;
    for i in 0..state.tanks.len() {
        let tank = &mut state.tanks[i];
        if !tank.is_alive() || tank.center_distance(p) >= p.explosion_radius() {
            continue;
        }
        let self_hit = origin_idx == Some(i);
        // receive_damage reports the alive-to-dead transition exactly once;
        // the is_alive gate above keeps overlapping blasts in the same pass
        // from counting a second kill.
        if tank.receive_damage(p.damage()) {
            let blast = Vec2::new(tank.x_pos() + TANK_WIDTH / 2.0, tank.y_pos());
            state.events.push(GameEvent::TankDestroyed { tank_id: tank.id() });
            state
                .explosions
                .push(Explosion::new(blast, 50.0, AnimationRate::Slow));
            if !self_hit {
                kills += 1;
            }
        }
        if !self_hit {
            damage_dealt += p.damage();
        }
    }
    if let Some(idx) = origin_idx {
        for _ in 0..kills {
            state.tanks[idx].add_kill();
        }
        if damage_dealt != 0 {
            state.tanks[idx].change_damage_dealt(damage_dealt);
        }
    }

    for o in &mut state.obstacles {
        o.apply_splash(p);
    }
    state.explosions.push(Explosion::new(
        p.position(),
        p.explosion_radius(),
        AnimationRate::Fast,
    ));
}

/// Fires the active tank and locks input until the next turn.
fn fire(state: &mut MatchState, power: f32) {
    let power = power.clamp(MIN_LAUNCH_POWER, MAX_LAUNCH_POWER);
    let MatchState {
        tanks,
        cur_idx,
        projectiles,
        rng,
        ..
    } = state;
    let shells = tanks[*cur_idx].fire(power, rng);
    log::debug!(
        "{} fires {} shell(s) at power {power:.0}, angle {:.1}",
        tanks[*cur_idx].name(),
        shells.len(),
        tanks[*cur_idx].gun_angle()
    );
    projectiles.extend(shells);
    state.events.push(GameEvent::ShotFired {
        tank_id: state.tanks[state.cur_idx].id(),
    });
    state.phase = MatchPhase::Resolving;
}

/// Advances to the next living tank, updates the wind and reopens input.
/// The caller guarantees at least one living tank remains.
fn next_turn(state: &mut MatchState) {
    let before = state.cur_idx;
    let n = state.tanks.len();
    state.cur_idx = (state.cur_idx + 1) % n;
    while !state.tanks[state.cur_idx].is_alive() {
        state.cur_idx = (state.cur_idx + 1) % n;
    }
    if state.cur_idx < before {
        state.round += 1;
    }
    state.wind += state.rng.random_range(-2.0..2.0);
    state.phase = MatchPhase::Aiming;
    let tank_id = state.cur_tank().id();
    state.events.push(GameEvent::TurnStarted {
        tank_id,
        round: state.round,
    });
    log::debug!(
        "Round {}: {}'s turn, wind {:.1}",
        state.round,
        state.cur_tank().name(),
        state.wind
    );
}

/// Annotates the roster with the outcome and closes the match. A draw (no
/// tank left alive) annotates everyone with a loss.
fn end_match(state: &mut MatchState) {
    let winner_id = state.tanks.iter().find(|t| t.is_alive()).map(|t| t.id());
    for tank in &mut state.tanks {
        tank.record_outcome(Some(tank.id()) == winner_id);
    }
    state.phase = MatchPhase::Over;
    state.events.push(GameEvent::MatchOver { winner_id });
    match winner_id {
        Some(id) => log::info!("Match over, winner id {id}"),
        None => log::info!("Match over, draw"),
    }
}
