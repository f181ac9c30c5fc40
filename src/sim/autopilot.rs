//! Idle/demo mode - steers the player up the tower
//!
//! The autopilot never passes under the platform it is climbing to. It holds
//! a point just outside that platform's footprint, jumps from the ground and
//! keeps rising with edge jumps near the top of each arc until its feet clear
//! the platform, then moves on to the next one.

use super::state::{GameState, Platform};
use super::tick::TickInput;

/// Sideways gap kept between the player and a platform's edge while climbing past it
const EDGE_CLEARANCE: f32 = 16.0;
/// Room past the climbing point needed to drift outward for an edge jump
const DRIFT_ROOM: f32 = 12.0;
/// Close enough to the aim point to stop steering
const ARRIVE_DISTANCE: f32 = 4.0;
/// How far from the climbing point the autopilot still jumps off the ground
const JUMP_REACH: f32 = 60.0;
/// Rising slower than this in the air: try an edge jump
const LIFT_SPEED: f32 = 60.0;

/// Lowest platform whose top is above the player's feet
fn next_target(state: &GameState) -> Option<&Platform> {
    let feet = state.player.body.aabb().min.y;
    state
        .platforms
        .iter()
        .map(|(_, p)| p)
        .filter(|p| p.aabb().max.y > feet + 1.0)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
}

/// Point beside `target` to climb from: the nearer side, unless a wall is in the way
fn climb_x(state: &GameState, target: &Platform, reach: f32) -> f32 {
    let x = state.player.pos().x;
    let half = state.player.body.size.x / 2.0;
    let [left, right] = state.surfaces.walls;
    let lo = left.max.x + half + DRIFT_ROOM;
    let hi = right.min.x - half - DRIFT_ROOM;

    let sides = [target.pos.x - reach, target.pos.x + reach];
    let by_distance = |a: &f32, b: &f32| (a - x).abs().total_cmp(&(b - x).abs());
    sides
        .into_iter()
        .filter(|s| (lo..=hi).contains(s))
        .min_by(by_distance)
        .or_else(|| sides.into_iter().min_by(by_distance))
        .unwrap_or(target.pos.x)
}

/// Pick the input a simple player would give this tick
pub fn steer(state: &GameState) -> TickInput {
    let player = &state.player;
    let pos = player.pos();
    let grounded = player.is_grounded();

    let Some(target) = next_target(state) else {
        return TickInput {
            jump: grounded,
            ..Default::default()
        };
    };

    let half = player.body.size.x / 2.0;
    let dx = target.pos.x - pos.x;
    // Inside the footprint: jumping now would hit the underside
    let beneath = dx.abs() < target.width / 2.0 + half;

    let reach = target.width / 2.0 + half + EDGE_CLEARANCE;
    let to_aim = climb_x(state, target, reach) - pos.x;
    let needs_lift = !grounded && player.vel().y < LIFT_SPEED;

    let move_direction = if to_aim.abs() >= ARRIVE_DISTANCE {
        to_aim.signum()
    } else if needs_lift {
        // Edge jumps need sideways speed; drift away from the platform
        -dx.signum()
    } else {
        0.0
    };

    let jump = !beneath
        && if grounded {
            to_aim.abs() < JUMP_REACH
        } else {
            needs_lift
        };

    TickInput {
        move_direction,
        jump,
        restart: false,
        idle_mode: false,
    }
}
