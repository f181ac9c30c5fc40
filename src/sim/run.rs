//! Run controller: ground contacts, jumping, scoring and respawn

use super::carrier;
use super::physics::{BodyId, Category, ContactEvent, ContactPhase};
use super::state::{GameEvent, GameState, Player, RespawnReason, Surfaces};
use crate::approach;
use crate::consts::*;

/// Whether the rest of the tick should still run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Respawned,
}

/// Horizontal control law: blend toward `move_direction * MOVE_SPEED`,
/// faster on the ground than in the air, then clamp.
pub fn horizontal_velocity(vx: f32, move_direction: f32, grounded: bool) -> f32 {
    let target = move_direction * MOVE_SPEED;
    let accel = if grounded {
        GROUND_ACCELERATION
    } else {
        AIR_ACCELERATION
    };
    approach(vx, target, accel).clamp(-MOVE_SPEED, MOVE_SPEED)
}

pub fn apply_horizontal_control(state: &mut GameState) {
    let grounded = state.player.is_grounded();
    let vel = &mut state.player.body.vel;
    vel.x = horizontal_velocity(vel.x, state.run.move_direction, grounded);
    vel.y = vel.y.max(MAX_FALL_SPEED);
}

/// Grounded, or an edge jump: not falling hard, moving fast sideways and
/// not straight after another jump.
pub fn can_jump(player: &Player, now: f64) -> bool {
    let vel = player.vel();
    player.is_grounded()
        || (vel.y > EDGE_JUMP_MIN_VY
            && vel.x.abs() > EDGE_JUMP_MIN_VX
            && player.time_since_jump(now) > EDGE_JUMP_COOLDOWN)
}

/// Jump if allowed. Returns whether the jump happened.
pub fn try_jump(state: &mut GameState) -> bool {
    if !can_jump(&state.player, state.time) {
        return false;
    }
    let vel = &mut state.player.body.vel;
    vel.y = (vel.y.max(0.0) + JUMP_IMPULSE).min(MAX_RISE_SPEED);
    carrier::release(&mut state.player);
    state.player.last_jump_time = Some(state.time);
    state.events.push(GameEvent::Jumped);
    true
}

/// React to one contact change from the physics step
pub fn handle_contact(state: &mut GameState, contact: ContactEvent) -> Flow {
    match (contact.phase, contact.category) {
        (ContactPhase::Begin, Category::Ground) => {
            let player = &mut state.player;
            player.ground_contacts += 1;
            player.last_ground_contact_time = Some(state.time);
            if player.ground_contacts == 1 {
                state.events.push(GameEvent::Landed);
            }
            if let BodyId::Platform(handle) = contact.body {
                if let Some(platform) = state.platforms.get(handle).filter(|p| p.is_moving()) {
                    carrier::attach(player, handle, platform.pos);
                }
            }
        }
        (ContactPhase::End, Category::Ground) => {
            let player = &mut state.player;
            player.ground_contacts = player.ground_contacts.saturating_sub(1);
            if let BodyId::Platform(handle) = contact.body {
                carrier::release_from(player, handle);
            }
            if player.ground_contacts == 0 {
                player.last_ground_contact_time = Some(state.time);
            }
        }
        (ContactPhase::Begin, Category::Hazard) => {
            respawn(state, RespawnReason::Hazard);
            return Flow::Respawned;
        }
        _ => {}
    }
    Flow::Continue
}

/// Award a point for every platform the player has climbed past
pub fn check_scoring(state: &mut GameState) -> u32 {
    let player_y = state.player.pos().y;
    let mut awarded = 0;
    for (_, platform) in state.platforms.iter_mut() {
        if !platform.scored && player_y > platform.pos.y + SCORE_MARGIN && platform.mark_scored() {
            awarded += 1;
        }
    }
    for _ in 0..awarded {
        award_point(state);
    }
    awarded
}

fn award_point(state: &mut GameState) {
    let run = &mut state.run;
    run.current_score += 1;
    state.events.push(GameEvent::PlatformScored {
        score: run.current_score,
    });
    if run.current_score > run.high_score {
        run.high_score = run.current_score;
        state.events.push(GameEvent::NewHighScore {
            score: run.high_score,
        });
    }
}

/// Respawn if the player dropped below the kill-zone
pub fn enforce_bounds(state: &mut GameState) -> Flow {
    if state.player.pos().y < state.surfaces.kill_zone_y() {
        respawn(state, RespawnReason::OutOfBounds);
        return Flow::Respawned;
    }
    Flow::Continue
}

/// End the current run and start a fresh one
pub fn respawn(state: &mut GameState, reason: RespawnReason) {
    let score = state.run.current_score;
    log::info!("Run over ({reason:?}) with score {score}, high {}", state.run.high_score);
    if score > 0 {
        state.events.push(GameEvent::RunFinished { score });
    }
    state.run.current_score = 0;
    state.run.move_direction = 0.0;
    state.run.runs += 1;
    reset_world(state);
    state.events.push(GameEvent::Respawned { reason });
}

/// Rebuild the opening world around the spawn point
pub(crate) fn reset_world(state: &mut GameState) {
    let playfield = state.playfield;
    let score = state.run.current_score;

    state.player = Player::spawn();
    state.player.last_ground_contact_time = Some(state.time);
    state.physics.reset_contacts();

    state
        .generator
        .build_starting(&mut state.platforms, score);

    state.camera.pos = state.player.pos();
    state.surfaces = Surfaces::new(&playfield, state.camera.pos.y);

    let spawn_y = state.player.pos().y;
    state.backdrop.reset(spawn_y + 140.0);
    state
        .backdrop
        .spawn_up_to(spawn_y + playfield.height(), &playfield);

    let target = spawn_y + SPAWN_MARGIN;
    state
        .generator
        .extend(&mut state.platforms, target, score, true);
    state.backdrop.spawn_up_to(target + 60.0, &playfield);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playfield::Playfield;
    use crate::sim::motion::{MotionKind, Oscillator, motion_params};
    use crate::sim::platforms::PlatformHandle;
    use crate::sim::state::Platform;
    use glam::Vec2;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(1234, Playfield::default(), 0)
    }

    fn contact(phase: ContactPhase, body: BodyId, category: Category) -> ContactEvent {
        ContactEvent {
            phase,
            body,
            category,
        }
    }

    #[test]
    fn test_edge_jump_rejected_when_falling_slowly_sideways() {
        let mut player = Player::spawn();
        player.body.vel = Vec2::new(5.0, -50.0);
        assert!(!can_jump(&player, 10.0));
    }

    #[test]
    fn test_edge_jump_accepted_in_window() {
        let mut player = Player::spawn();
        player.body.vel = Vec2::new(20.0, -10.0);
        player.last_jump_time = Some(9.9);
        assert!(can_jump(&player, 10.0));
    }

    #[test]
    fn test_edge_jump_needs_cooldown() {
        let mut player = Player::spawn();
        player.body.vel = Vec2::new(20.0, -10.0);
        player.last_jump_time = Some(9.95);
        assert!(!can_jump(&player, 10.0));
    }

    #[test]
    fn test_grounded_can_always_jump() {
        let mut player = Player::spawn();
        player.ground_contacts = 1;
        player.body.vel = Vec2::new(0.0, -200.0);
        assert!(can_jump(&player, 0.0));
    }

    #[test]
    fn test_jump_sets_rise_and_releases_carry() {
        let mut s = state();
        s.time = 5.0;
        s.player.ground_contacts = 1;
        s.player.body.vel.y = -40.0;
        let handle = s.platforms.iter().next().map(|(h, _)| h).unwrap();
        carrier::attach(&mut s.player, handle, Vec2::ZERO);

        assert!(try_jump(&mut s));
        assert_eq!(s.player.vel().y, JUMP_IMPULSE.min(MAX_RISE_SPEED));
        assert!(s.player.carrying.is_none());
        assert_eq!(s.player.last_jump_time, Some(5.0));
        assert!(s.events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_control_law_ground_snappier_than_air() {
        let ground = horizontal_velocity(0.0, 1.0, true);
        let air = horizontal_velocity(0.0, 1.0, false);
        assert!((ground - MOVE_SPEED * GROUND_ACCELERATION).abs() < 1e-4);
        assert!((air - MOVE_SPEED * AIR_ACCELERATION).abs() < 1e-4);
        assert_eq!(horizontal_velocity(500.0, 1.0, true), MOVE_SPEED);
        assert!(horizontal_velocity(100.0, 0.0, true) < 100.0);
    }

    #[test]
    fn test_ground_contacts_never_negative() {
        let mut s = state();
        s.player.ground_contacts = 0;
        handle_contact(&mut s, contact(ContactPhase::End, BodyId::Ground, Category::Ground));
        assert_eq!(s.player.ground_contacts, 0);
        assert!(s.player.last_ground_contact_time.is_some());
    }

    #[test]
    fn test_moving_platform_contact_attaches_and_end_releases() {
        let mut s = state();
        let pos = Vec2::new(0.0, 300.0);
        let osc = Oscillator::new(pos, Vec2::new(-50.0, 300.0), Vec2::new(50.0, 300.0), 1.0, 1.0);
        let handle: PlatformHandle = s.platforms.insert(Platform::oscillating(
            100.0,
            pos,
            MotionKind::Horizontal,
            motion_params(0),
            osc,
        ));

        handle_contact(&mut s, contact(ContactPhase::Begin, BodyId::Platform(handle), Category::Ground));
        assert_eq!(s.player.ground_contacts, 1);
        assert_eq!(s.player.carrying.map(|c| c.platform), Some(handle));

        handle_contact(&mut s, contact(ContactPhase::End, BodyId::Platform(handle), Category::Ground));
        assert_eq!(s.player.ground_contacts, 0);
        assert!(s.player.carrying.is_none());
    }

    #[test]
    fn test_static_platform_contact_does_not_attach() {
        let mut s = state();
        let handle = s.platforms.insert(Platform::fixed(100.0, Vec2::new(0.0, 300.0)));
        handle_contact(&mut s, contact(ContactPhase::Begin, BodyId::Platform(handle), Category::Ground));
        assert!(s.player.carrying.is_none());
    }

    #[test]
    fn test_scoring_crosses_platform_once() {
        let mut s = state();
        s.platforms.clear();
        for y in [-20.0, 40.0, 110.0] {
            let mut p = Platform::fixed(120.0, Vec2::new(0.0, y));
            // The sweep starts above the lower two; marking them isolates the
            // threshold of the top one (center + margin = 118)
            p.scored = y < 100.0;
            s.platforms.insert(p);
        }
        s.player.body.pos = Vec2::new(0.0, 0.0);

        let mut y = 0.0;
        while y < 140.0 {
            y += 2.0;
            s.player.body.pos.y = y;
            check_scoring(&mut s);
            if y <= 118.0 {
                assert_eq!(s.run.current_score, 0, "scored too early at y={y}");
            }
        }
        assert_eq!(s.run.current_score, 1);
        let scored_events = s
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlatformScored { .. }))
            .count();
        assert_eq!(scored_events, 1);
    }

    #[test]
    fn test_high_score_follows_current() {
        let mut s = GameState::new(1, Playfield::default(), 2);
        s.platforms.clear();
        for y in [0.0, 10.0, 20.0] {
            s.platforms.insert(Platform::fixed(100.0, Vec2::new(0.0, y)));
        }
        s.player.body.pos.y = 100.0;
        assert_eq!(check_scoring(&mut s), 3);
        assert_eq!(s.run.current_score, 3);
        assert_eq!(s.run.high_score, 3);
        assert!(s.events.contains(&GameEvent::NewHighScore { score: 3 }));
    }

    #[test]
    fn test_hazard_contact_respawns_once() {
        let mut s = state();
        s.run.current_score = 4;
        s.player.ground_contacts = 2;
        s.player.body.pos = Vec2::new(50.0, 900.0);
        s.player.body.vel = Vec2::new(10.0, -100.0);

        let flow = handle_contact(&mut s, contact(ContactPhase::Begin, BodyId::Hazard, Category::Hazard));
        assert_eq!(flow, Flow::Respawned);

        let finished: Vec<_> = s
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunFinished { .. }))
            .collect();
        assert_eq!(finished, vec![&GameEvent::RunFinished { score: 4 }]);
        let respawns = s
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Respawned { .. }))
            .count();
        assert_eq!(respawns, 1);
    }

    #[test]
    fn test_respawn_resets_run() {
        let mut s = state();
        s.run.current_score = 7;
        s.run.high_score = 7;
        s.run.move_direction = 1.0;
        s.player.ground_contacts = 3;
        s.player.body.pos = Vec2::new(80.0, 2_000.0);
        s.player.body.vel = Vec2::new(100.0, 100.0);

        respawn(&mut s, RespawnReason::Restart);

        assert_eq!(s.run.current_score, 0);
        assert_eq!(s.run.high_score, 7);
        assert_eq!(s.run.move_direction, 0.0);
        assert_eq!(s.player.ground_contacts, 0);
        assert!(s.player.carrying.is_none());
        assert_eq!(s.player.pos(), PLAYER_SPAWN);
        assert_eq!(s.player.vel(), Vec2::ZERO);
        assert!(s.generator.frontier_y() >= PLAYER_SPAWN.y + SPAWN_MARGIN);
        assert!(s.platforms.iter().all(|(_, p)| !p.scored));
        assert!(s.physics.touching().is_empty());
    }

    #[test]
    fn test_zero_score_run_not_recorded() {
        let mut s = state();
        respawn(&mut s, RespawnReason::Restart);
        assert!(!s.events.iter().any(|e| matches!(e, GameEvent::RunFinished { .. })));
    }

    #[test]
    fn test_falling_below_kill_zone_respawns() {
        let mut s = state();
        s.player.body.pos.y = s.surfaces.kill_zone_y() - 1.0;
        assert_eq!(enforce_bounds(&mut s), Flow::Respawned);
        assert_eq!(s.player.pos(), PLAYER_SPAWN);
        assert_eq!(enforce_bounds(&mut s), Flow::Continue);
    }

    proptest! {
        #[test]
        fn prop_ground_contacts_never_underflow(phases in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut s = state();
            let mut expected: u32 = 0;
            for begin in phases {
                let phase = if begin { ContactPhase::Begin } else { ContactPhase::End };
                handle_contact(&mut s, contact(phase, BodyId::Ground, Category::Ground));
                expected = if begin { expected + 1 } else { expected.saturating_sub(1) };
                prop_assert_eq!(s.player.ground_contacts, expected);
                prop_assert_eq!(s.player.is_grounded(), expected > 0);
            }
        }

        #[test]
        fn prop_high_score_never_decreases(steps in proptest::collection::vec(0u8..3, 0..40)) {
            let mut s = state();
            let mut last_high = s.run.high_score;
            for step in steps {
                match step {
                    0 => {
                        let y = s.player.pos().y + 10.0;
                        s.platforms.insert(Platform::fixed(100.0, Vec2::new(0.0, y - 20.0)));
                        s.player.body.pos.y = y;
                        check_scoring(&mut s);
                    }
                    1 => respawn(&mut s, RespawnReason::Restart),
                    _ => {
                        s.player.body.pos.y = s.surfaces.kill_zone_y() - 5.0;
                        enforce_bounds(&mut s);
                    }
                }
                prop_assert!(s.run.high_score >= last_high);
                prop_assert!(s.run.high_score >= s.run.current_score);
                last_high = s.run.high_score;
            }
        }
    }
}
