//! Headless demo match
//!
//! Runs a scripted AI match at the fixed simulation rate and prints the
//! final standings. Mostly useful for watching the engine via `RUST_LOG`.

use std::time::{SystemTime, UNIX_EPOCH};

use tanks2d::consts::*;
use tanks2d::players::{sort_players, PlayerStats};
use tanks2d::render::Color;
use tanks2d::sim::{tick, GameEvent, MatchPhase, MatchState, TickInput};

/// Scripted input for the active tank: swing the gun towards the nearest
/// living opponent and fire once roughly on target.
fn script_input(state: &MatchState) -> TickInput {
    let cur = state.cur_tank();
    let cur_center = cur.x_pos() + TANK_WIDTH / 2.0;
    let target = state
        .tanks
        .iter()
        .filter(|t| t.is_alive() && t.id() != cur.id())
        .min_by(|a, b| {
            let da = (a.x_pos() - cur.x_pos()).abs();
            let db = (b.x_pos() - cur.x_pos()).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
    let Some(target) = target else {
        return TickInput::default();
    };

    let dx = target.x_pos() + TANK_WIDTH / 2.0 - cur_center;
    let desired = if dx >= 0.0 { 55.0 } else { -55.0 };
    let off_target = desired - cur.gun_angle();
    if off_target.abs() > 1.0 {
        TickInput {
            gun_movement: off_target.signum(),
            ..TickInput::default()
        }
    } else {
        TickInput {
            fire: true,
            power: (10.0 + dx.abs() / 6.0).clamp(MIN_LAUNCH_POWER, MAX_LAUNCH_POWER),
            ..TickInput::default()
        }
    }
}

fn demo_roster() -> Vec<PlayerStats> {
    vec![
        PlayerStats::new_empty(1, "Red Baron").with_color(Color::rgb(200, 30, 30)),
        PlayerStats::new_empty(2, "Steel Rain").with_color(Color::rgb(30, 30, 200)),
        PlayerStats::new_empty(3, "Dust Devil").with_color(Color::rgb(160, 120, 20)),
    ]
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
    log::info!("Demo match, seed {seed}");

    let mut state = MatchState::new(demo_roster(), seed);

    // Fixed-rate loop; the cap keeps a pathological stalemate from hanging
    let max_ticks = 60 * 60 * 30;
    for _ in 0..max_ticks {
        let input = if state.phase == MatchPhase::Aiming {
            script_input(&state)
        } else {
            TickInput::default()
        };
        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::TankDestroyed { tank_id } => {
                    log::info!("Tank {tank_id} destroyed");
                }
                GameEvent::MatchOver { winner_id } => match winner_id {
                    Some(id) => log::info!("Winner: tank {id}"),
                    None => log::info!("Draw, nobody left standing"),
                },
                _ => {}
            }
        }
        if state.is_over() {
            break;
        }
    }

    if !state.is_over() {
        println!("Match hit the tick cap without a result (seed {seed})");
        return;
    }

    let mut standings = state.results();
    sort_players(&mut standings);
    println!("Final standings (seed {seed}):");
    for (place, p) in standings.iter().enumerate() {
        let outcome = if p.wins > 0 { "won" } else { "lost" };
        println!(
            "{}. {} - {outcome}, {} kills, {} dmg dealt, {} dmg received",
            place + 1,
            p.name,
            p.kills,
            p.dmg_dealt,
            p.dmg_received
        );
    }
}
