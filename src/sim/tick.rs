//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::autopilot;
use super::carrier;
use super::run::{self, Flow};
use super::state::{GameState, RespawnReason};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// -1 left, 0 idle, +1 right
    pub move_direction: f32,
    /// Jump was pressed since the last tick
    pub jump: bool,
    /// Abandon the run and respawn
    pub restart: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// New facing for a movement direction; unchanged inside the deadzone
pub fn facing_for(current: f32, move_direction: f32) -> f32 {
    if move_direction > FACING_DEADZONE {
        1.0
    } else if move_direction < -FACING_DEADZONE {
        -1.0
    } else {
        current
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    state.time += f64::from(dt);

    let input = if input.idle_mode {
        autopilot::steer(state)
    } else {
        input.clone()
    };

    if input.restart {
        run::respawn(state, RespawnReason::Restart);
        return;
    }

    // Intent
    state.run.move_direction = input.move_direction.clamp(-1.0, 1.0);
    state.player.facing = facing_for(state.player.facing, state.run.move_direction);
    if input.jump {
        run::try_jump(state);
    }
    run::apply_horizontal_control(state);

    // Physics
    let statics = state.static_bodies();
    let contacts = state.physics.step(&mut state.player.body, &statics, dt);
    for contact in contacts {
        if run::handle_contact(state, contact) == Flow::Respawned {
            return;
        }
    }

    // Platforms move after the player has been resolved against them,
    // then the carrier hands the displacement on
    for (_, platform) in state.platforms.iter_mut() {
        platform.advance(dt);
    }
    state.backdrop.advance(dt);
    carrier::sync(&mut state.player, &state.platforms, state.time);

    // Streaming
    let playfield = state.playfield;
    let score = state.run.current_score;
    let target = state.player.pos().y + SPAWN_MARGIN;
    state
        .generator
        .extend(&mut state.platforms, target, score, false);
    let removed = state
        .generator
        .cull(&mut state.platforms, state.camera.pos.y - CLEANUP_MARGIN);
    carrier::release_if_removed(&mut state.player, &removed);
    state.backdrop.cull(state.camera.pos.y - playfield.height());

    // Camera and the volumes tied to it
    state.camera.follow(state.player.pos().y);
    state
        .surfaces
        .follow_camera(&playfield, state.camera.pos.y);
    state
        .backdrop
        .spawn_up_to(state.camera.pos.y + playfield.height(), &playfield);

    run::check_scoring(state);
    run::enforce_bounds(state);
}
