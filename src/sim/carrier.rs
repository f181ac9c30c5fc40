//! Moving-platform carrier
//!
//! While the player stands on a moving platform its per-tick displacement is
//! added straight onto the player position. Velocity is left alone, so
//! walking and jumping keep working normally on top of the ride.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platforms::{PlatformHandle, PlatformSet};
use super::state::Player;
use crate::consts::*;

/// The platform carrying the player and where it was at the last sync
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Carry {
    pub platform: PlatformHandle,
    pub last_pos: Vec2,
}

/// Start riding `platform`, currently at `pos`
pub fn attach(player: &mut Player, platform: PlatformHandle, pos: Vec2) {
    player.carrying = Some(Carry {
        platform,
        last_pos: pos,
    });
}

pub fn release(player: &mut Player) {
    player.carrying = None;
}

/// Release if the player is riding `platform`
pub fn release_from(player: &mut Player, platform: PlatformHandle) {
    if player.carrying.is_some_and(|c| c.platform == platform) {
        player.carrying = None;
    }
}

/// Release if the carrying platform is among `removed`
pub fn release_if_removed(player: &mut Player, removed: &[PlatformHandle]) {
    if player
        .carrying
        .is_some_and(|c| removed.contains(&c.platform))
    {
        player.carrying = None;
    }
}

/// Apply the carrying platform's movement since the last sync.
/// Returns the displacement applied to the player.
pub fn sync(player: &mut Player, platforms: &PlatformSet, now: f64) -> Vec2 {
    if !player.grounded_recently(now) {
        release(player);
        return Vec2::ZERO;
    }
    let Some(carry) = player.carrying else {
        return Vec2::ZERO;
    };
    let Some(platform) = platforms.get(carry.platform) else {
        release(player);
        return Vec2::ZERO;
    };
    if player.body.vel.y.abs() > CARRY_RELEASE_SPEED {
        release(player);
        return Vec2::ZERO;
    }

    let delta = platform.pos - carry.last_pos;
    if delta.x.abs() > f32::EPSILON {
        player.body.pos.x += delta.x;
    }
    if delta.y.abs() > f32::EPSILON {
        player.body.pos.y += delta.y;
        player.body.vel.y = player.body.vel.y.max(0.0);
    }
    player.carrying = Some(Carry {
        platform: carry.platform,
        last_pos: platform.pos,
    });
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::motion::{MotionKind, Oscillator, motion_params};
    use crate::sim::state::Platform;

    fn moving_platform(pos: Vec2) -> Platform {
        let osc = Oscillator::new(
            pos,
            Vec2::new(-50.0, pos.y),
            Vec2::new(50.0, pos.y),
            1.0,
            1.0,
        );
        Platform::oscillating(100.0, pos, MotionKind::Horizontal, motion_params(0), osc)
    }

    fn grounded_player_on(platforms: &mut PlatformSet, pos: Vec2) -> (Player, PlatformHandle) {
        let handle = platforms.insert(moving_platform(pos));
        let mut player = Player::spawn();
        player.body.pos = pos + Vec2::new(0.0, 25.0);
        player.ground_contacts = 1;
        attach(&mut player, handle, pos);
        (player, handle)
    }

    #[test]
    fn test_player_follows_horizontal_delta() {
        let mut platforms = PlatformSet::new();
        let (mut player, handle) = grounded_player_on(&mut platforms, Vec2::ZERO);
        player.body.vel.x = 0.0;
        let start_x = player.body.pos.x;

        platforms.get_mut(handle).unwrap().pos.x += 10.0;
        let delta = sync(&mut player, &platforms, 1.0);

        assert_eq!(delta, Vec2::new(10.0, 0.0));
        assert!((player.body.pos.x - (start_x + 10.0)).abs() < 1e-5);
        assert_eq!(player.body.vel.x, 0.0);
        assert_eq!(player.carrying.unwrap().last_pos, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_vertical_carry_stops_downward_velocity() {
        let mut platforms = PlatformSet::new();
        let (mut player, handle) = grounded_player_on(&mut platforms, Vec2::ZERO);
        player.body.vel.y = -8.0;

        platforms.get_mut(handle).unwrap().pos.y -= 3.0;
        sync(&mut player, &platforms, 1.0);

        assert!((player.body.pos.y - 22.0).abs() < 1e-5);
        assert_eq!(player.body.vel.y, 0.0);
    }

    #[test]
    fn test_fast_vertical_speed_releases() {
        let mut platforms = PlatformSet::new();
        let (mut player, handle) = grounded_player_on(&mut platforms, Vec2::ZERO);
        player.body.vel.y = CARRY_RELEASE_SPEED + 1.0;
        platforms.get_mut(handle).unwrap().pos.x += 10.0;
        let before = player.body.pos;

        assert_eq!(sync(&mut player, &platforms, 1.0), Vec2::ZERO);
        assert!(player.carrying.is_none());
        assert_eq!(player.body.pos, before);
    }

    #[test]
    fn test_culled_platform_releases() {
        let mut platforms = PlatformSet::new();
        let (mut player, handle) = grounded_player_on(&mut platforms, Vec2::ZERO);
        platforms.remove(handle);
        sync(&mut player, &platforms, 1.0);
        assert!(player.carrying.is_none());
    }

    #[test]
    fn test_airborne_past_grace_releases() {
        let mut platforms = PlatformSet::new();
        let (mut player, _) = grounded_player_on(&mut platforms, Vec2::ZERO);
        player.ground_contacts = 0;
        player.last_ground_contact_time = Some(1.0);

        sync(&mut player, &platforms, 1.05);
        assert!(player.carrying.is_some(), "inside grace window");
        sync(&mut player, &platforms, 1.5);
        assert!(player.carrying.is_none());
    }

    #[test]
    fn test_release_helpers() {
        let mut platforms = PlatformSet::new();
        let (mut player, handle) = grounded_player_on(&mut platforms, Vec2::ZERO);
        let other = platforms.insert(moving_platform(Vec2::new(0.0, 200.0)));

        release_from(&mut player, other);
        assert!(player.carrying.is_some());
        release_if_removed(&mut player, &[other]);
        assert!(player.carrying.is_some());
        release_if_removed(&mut player, &[handle]);
        assert!(player.carrying.is_none());
    }
}
