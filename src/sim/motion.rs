//! Moving-platform motion: difficulty table, travel planning and oscillation
//!
//! Difficulty is a pure function of the score at spawn time. Once a platform
//! has its [`Oscillator`] nothing about it changes with later score.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::playfield::Playfield;

/// How a platform moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionKind {
    #[default]
    Static,
    Horizontal,
    Vertical,
    Diagonal,
}

/// Travel distances and speed for moving platforms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionParams {
    /// Distance to each side of the spawn X
    pub horizontal_travel: f32,
    /// Distance above and below the spawn Y (0 = no vertical motion)
    pub vertical_travel: f32,
    /// Units per second along a leg
    pub speed: f32,
}

/// Motion parameters for the current score.
///
/// | score | effect |
/// | ----- | ------ |
/// | any   | travel 120, speed 100, no vertical |
/// | ≥ 5   | boost = min((score - 4) * 0.08, 1): travel × (1 + boost), speed × (1 + 0.65 boost) |
/// | ≥ 12  | vertical = 80 × min(1 + (score - 12) * 0.08, 1.8) |
/// | ≥ 18  | speed × 1.15 |
/// | ≥ 24  | travel × 1.1, speed × 1.1 |
///
/// Every factor is capped, so the table saturates from score 24 on.
pub fn motion_params(score: u32) -> MotionParams {
    let mut horizontal = 120.0;
    let mut vertical = 0.0;
    let mut speed = 100.0;

    if score >= 5 {
        let boost = ((score - 4) as f32 * 0.08).min(1.0);
        horizontal *= 1.0 + boost;
        speed *= 1.0 + boost * 0.65;
    }

    if score >= 12 {
        vertical = 80.0 * (1.0 + (score - 12) as f32 * 0.08).min(1.8);
    }

    if score >= 18 {
        speed *= 1.15;
    }

    if score >= 24 {
        horizontal *= 1.1;
        speed *= 1.1;
    }

    MotionParams {
        horizontal_travel: horizontal,
        vertical_travel: vertical,
        speed,
    }
}

/// Requested motion kind for the `index`-th created platform at `score`
pub fn motion_kind(score: u32, index: u32) -> MotionKind {
    match score {
        0..15 => MotionKind::Horizontal,
        15..20 => {
            if index.is_multiple_of(2) {
                MotionKind::Vertical
            } else {
                MotionKind::Horizontal
            }
        }
        _ => match index % 3 {
            0 => MotionKind::Diagonal,
            1 => MotionKind::Vertical,
            _ => MotionKind::Horizontal,
        },
    }
}

/// Back-and-forth movement between two endpoints
///
/// The first leg runs from the spawn position to `endpoints[0]`, then the
/// platform loops endpoints[0] → endpoints[1] → endpoints[0] ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    endpoints: [Vec2; 2],
    /// Endpoint the current leg is heading to
    next: usize,
    leg_from: Vec2,
    elapsed: f32,
    leg_duration: f32,
    loop_duration: f32,
}

impl Oscillator {
    pub fn new(start: Vec2, first: Vec2, second: Vec2, first_leg: f32, loop_leg: f32) -> Self {
        Self {
            endpoints: [first, second],
            next: 0,
            leg_from: start,
            elapsed: 0.0,
            leg_duration: first_leg.max(f32::EPSILON),
            loop_duration: loop_leg.max(f32::EPSILON),
        }
    }

    pub fn endpoints(&self) -> [Vec2; 2] {
        self.endpoints
    }

    /// Current position along the active leg
    pub fn position(&self) -> Vec2 {
        let t = (self.elapsed / self.leg_duration).clamp(0.0, 1.0);
        self.leg_from.lerp(self.endpoints[self.next], t)
    }

    /// Advance by `dt` seconds and return the new position
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        self.elapsed += dt;
        while self.elapsed >= self.leg_duration {
            self.elapsed -= self.leg_duration;
            self.leg_from = self.endpoints[self.next];
            self.next ^= 1;
            self.leg_duration = self.loop_duration;
        }
        self.position()
    }
}

#[inline]
fn leg_duration(distance: f32, speed: f32) -> f32 {
    (distance / speed).max(MIN_LEG_DURATION)
}

/// Build the motion for a platform of `width` spawned at `base`.
///
/// Travel is clamped to the playfield. Returns `None` when the platform
/// should stay static (requested static, or the clamped span is too short);
/// vertical and diagonal requests without a usable vertical span degrade to
/// horizontal. The second value is the kind actually planned.
pub fn plan_motion(
    requested: MotionKind,
    params: &MotionParams,
    base: Vec2,
    width: f32,
    playfield: &Playfield,
    start_leftward: bool,
) -> Option<(MotionKind, Oscillator)> {
    let (min_x, max_x) = playfield.x_range(width / 2.0, MOTION_PADDING);
    let left = min_x.max(base.x - params.horizontal_travel);
    let right = max_x.min(base.x + params.horizontal_travel);
    let horizontal_ok = right - left >= MIN_TRAVEL_SPAN;

    let upper = base.y + params.vertical_travel;
    let lower = base.y - params.vertical_travel;
    let vertical_ok = upper - lower >= MIN_TRAVEL_SPAN;

    let kind = match requested {
        MotionKind::Static => MotionKind::Static,
        MotionKind::Horizontal => MotionKind::Horizontal,
        MotionKind::Vertical if vertical_ok => MotionKind::Vertical,
        MotionKind::Diagonal if vertical_ok && horizontal_ok => MotionKind::Diagonal,
        MotionKind::Diagonal if vertical_ok => MotionKind::Vertical,
        MotionKind::Vertical | MotionKind::Diagonal => MotionKind::Horizontal,
    };

    let speed = params.speed;
    let oscillator = match kind {
        MotionKind::Static => return None,
        MotionKind::Horizontal => {
            if !horizontal_ok {
                return None;
            }
            let (first, second) = if start_leftward {
                (left, right)
            } else {
                (right, left)
            };
            Oscillator::new(
                base,
                Vec2::new(first, base.y),
                Vec2::new(second, base.y),
                leg_duration((base.x - first).abs(), speed),
                leg_duration(right - left, speed),
            )
        }
        MotionKind::Vertical => {
            let full = leg_duration(upper - lower, speed);
            Oscillator::new(
                base,
                Vec2::new(base.x, upper),
                Vec2::new(base.x, lower),
                full,
                full,
            )
        }
        MotionKind::Diagonal => {
            let full = leg_duration(right - left, speed);
            Oscillator::new(
                base,
                Vec2::new(left, upper),
                Vec2::new(right, lower),
                full,
                full,
            )
        }
    };

    Some((kind, oscillator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_kind_table() {
        assert_eq!(motion_kind(0, 5), MotionKind::Horizontal);
        assert_eq!(motion_kind(14, 10), MotionKind::Horizontal);
        assert_eq!(motion_kind(15, 10), MotionKind::Vertical);
        assert_eq!(motion_kind(19, 15), MotionKind::Horizontal);
        assert_eq!(motion_kind(20, 15), MotionKind::Diagonal);
        assert_eq!(motion_kind(30, 25), MotionKind::Vertical);
        assert_eq!(motion_kind(30, 20), MotionKind::Horizontal);
    }

    #[test]
    fn test_params_low_score_has_no_vertical() {
        let p = motion_params(0);
        assert_eq!(p.horizontal_travel, 120.0);
        assert_eq!(p.vertical_travel, 0.0);
        assert_eq!(p.speed, 100.0);
        assert_eq!(motion_params(11).vertical_travel, 0.0);
        assert!(motion_params(12).vertical_travel > 0.0);
    }

    #[test]
    fn test_params_saturate() {
        assert_eq!(motion_params(24), motion_params(10_000));
    }

    #[test]
    fn test_narrow_travel_falls_back_to_static() {
        let playfield = Playfield::default();
        let params = MotionParams {
            horizontal_travel: 5.0,
            vertical_travel: 0.0,
            speed: 100.0,
        };
        let plan = plan_motion(
            MotionKind::Horizontal,
            &params,
            Vec2::ZERO,
            PLATFORM_MAX_WIDTH,
            &playfield,
            true,
        );
        assert!(plan.is_none());
        // Vertical request with no vertical span degrades to horizontal, which is too short too
        let plan = plan_motion(MotionKind::Vertical, &params, Vec2::ZERO, 100.0, &playfield, true);
        assert!(plan.is_none());
    }

    #[test]
    fn test_diagonal_without_vertical_is_horizontal() {
        let playfield = Playfield::default();
        let (kind, _) = plan_motion(
            MotionKind::Diagonal,
            &motion_params(3),
            Vec2::new(0.0, 400.0),
            100.0,
            &playfield,
            false,
        )
        .unwrap();
        assert_eq!(kind, MotionKind::Horizontal);
    }

    #[test]
    fn test_horizontal_travel_clamped_to_playfield() {
        let playfield = Playfield::default();
        let (_, osc) = plan_motion(
            MotionKind::Horizontal,
            &motion_params(30),
            Vec2::new(100.0, 0.0),
            120.0,
            &playfield,
            true,
        )
        .unwrap();
        let (min_x, max_x) = playfield.x_range(60.0, MOTION_PADDING);
        for end in osc.endpoints() {
            assert!(end.x >= min_x - 1e-4 && end.x <= max_x + 1e-4);
        }
    }

    #[test]
    fn test_vertical_range_centered_on_spawn() {
        let playfield = Playfield::default();
        let params = motion_params(20);
        let (kind, osc) = plan_motion(
            MotionKind::Vertical,
            &params,
            Vec2::new(0.0, 500.0),
            100.0,
            &playfield,
            true,
        )
        .unwrap();
        assert_eq!(kind, MotionKind::Vertical);
        let [top, bottom] = osc.endpoints();
        assert!((top.y - (500.0 + params.vertical_travel)).abs() < 1e-3);
        assert!((bottom.y - (500.0 - params.vertical_travel)).abs() < 1e-3);
    }

    #[test]
    fn test_oscillator_reverses_at_endpoint() {
        let mut osc = Oscillator::new(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(-10.0, 0.0), 1.0, 2.0);
        assert!((osc.advance(1.0).x - 10.0).abs() < 1e-4);
        assert!((osc.advance(1.0).x - 0.0).abs() < 1e-4);
        assert!((osc.advance(1.0).x + 10.0).abs() < 1e-4);
        assert!((osc.advance(0.5).x + 5.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_params_non_decreasing(score in 0u32..200) {
            let a = motion_params(score);
            let b = motion_params(score + 1);
            prop_assert!(b.horizontal_travel >= a.horizontal_travel);
            prop_assert!(b.vertical_travel >= a.vertical_travel);
            prop_assert!(b.speed >= a.speed);
        }

        #[test]
        fn prop_oscillator_stays_on_path(
            steps in proptest::collection::vec(0.0f32..0.5, 1..200),
            start_leftward in any::<bool>(),
            score in 0u32..40,
            index in 0u32..12,
            x in -100.0f32..100.0,
        ) {
            let playfield = Playfield::default();
            let base = Vec2::new(x, 0.0);
            let plan = plan_motion(
                motion_kind(score, index),
                &motion_params(score),
                base,
                100.0,
                &playfield,
                start_leftward,
            );
            if let Some((_, mut osc)) = plan {
                let [a, b] = osc.endpoints();
                let lo = a.min(b).min(base) - Vec2::splat(1e-3);
                let hi = a.max(b).max(base) + Vec2::splat(1e-3);
                for dt in steps {
                    let p = osc.advance(dt);
                    prop_assert!(p.x >= lo.x && p.x <= hi.x);
                    prop_assert!(p.y >= lo.y && p.y <= hi.y);
                }
            }
        }
    }
}
