//! Procedural platform streaming and the decorative cloud backdrop
//!
//! Platforms are spawned at a frontier Y that advances by a random step,
//! and culled once they fall far enough behind the camera. All randomness
//! comes from seeded PCG streams so a run replays exactly from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::motion::{Oscillator, motion_kind, motion_params, plan_motion};
use super::platforms::{PlatformHandle, PlatformSet};
use super::state::Platform;
use crate::consts::*;
use crate::playfield::Playfield;

/// The fixed opening layout: (width, center)
pub const STARTING_PLATFORMS: [(f32, Vec2); 3] = [
    (140.0, Vec2::new(-100.0, -20.0)),
    (140.0, Vec2::new(120.0, 40.0)),
    (110.0, Vec2::new(-40.0, 110.0)),
];

/// Spawns platforms ahead of the player and culls them behind the camera
#[derive(Debug, Clone)]
pub struct PlatformGenerator {
    rng: Pcg32,
    playfield: Playfield,
    /// Y of the next platform to spawn
    frontier_y: f32,
    /// Platforms created this run (selects which ones move)
    created: u32,
}

impl PlatformGenerator {
    pub fn new(seed: u64, playfield: Playfield) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            playfield,
            frontier_y: 0.0,
            created: 0,
        }
    }

    #[inline]
    pub fn frontier_y(&self) -> f32 {
        self.frontier_y
    }

    #[inline]
    pub fn created(&self) -> u32 {
        self.created
    }

    fn spacing(&mut self) -> f32 {
        self.rng
            .random_range(PLATFORM_SPACING_MIN..=PLATFORM_SPACING_MAX)
    }

    /// Replace the active set with the opening layout and reset the counter
    pub fn build_starting(&mut self, platforms: &mut PlatformSet, score: u32) {
        platforms.clear();
        self.created = 0;
        for (width, pos) in STARTING_PLATFORMS {
            self.add_platform(platforms, width, pos, score);
        }
        self.frontier_y = platforms.highest_y().unwrap_or(140.0) + self.spacing();
    }

    /// Create a platform; every Nth one gets motion chosen from `score`
    pub fn add_platform(
        &mut self,
        platforms: &mut PlatformSet,
        width: f32,
        pos: Vec2,
        score: u32,
    ) -> PlatformHandle {
        self.created += 1;
        let index = self.created;

        let mut platform = Platform::fixed(width, pos);
        if index.is_multiple_of(MOVING_PLATFORM_INTERVAL) {
            let params = motion_params(score);
            let requested = motion_kind(score, index);
            let start_leftward = self.rng.random_bool(0.5);
            match plan_motion(requested, &params, pos, width, &self.playfield, start_leftward) {
                Some((kind, oscillator)) => {
                    log::debug!("Platform #{index} moves {kind:?} (score {score})");
                    platform = Platform::oscillating(width, pos, kind, params, oscillator);
                }
                None => log::debug!("Platform #{index} travel collapsed, staying static"),
            }
        }
        platform.index = index;
        platforms.insert(platform)
    }

    /// Spawn one randomly sized platform at `y`
    pub fn spawn_at(&mut self, platforms: &mut PlatformSet, y: f32, score: u32) -> PlatformHandle {
        let width = self.rng.random_range(PLATFORM_MIN_WIDTH..=PLATFORM_MAX_WIDTH);
        let (min_x, max_x) = self.playfield.x_range(width / 2.0, PLATFORM_SIDE_MARGIN);
        let x = if max_x > min_x {
            self.rng.random_range(min_x..=max_x)
        } else {
            (min_x + max_x) / 2.0
        };
        self.add_platform(platforms, width, Vec2::new(x, y), score)
    }

    /// Spawn platforms while the frontier is below `target_y`.
    /// With `force`, at least one platform is spawned. Returns the spawn count.
    pub fn extend(
        &mut self,
        platforms: &mut PlatformSet,
        target_y: f32,
        score: u32,
        force: bool,
    ) -> usize {
        let mut spawned = 0;
        while (force && spawned == 0) || self.frontier_y < target_y {
            self.spawn_at(platforms, self.frontier_y, score);
            self.frontier_y += self.spacing();
            spawned += 1;
        }
        if spawned > 0 {
            log::debug!(
                "Spawned {spawned} platform(s), frontier now {:.1}",
                self.frontier_y
            );
        }
        spawned
    }

    /// Remove every platform below `below_y`
    pub fn cull(&self, platforms: &mut PlatformSet, below_y: f32) -> Vec<PlatformHandle> {
        let removed = platforms.retain(|p| p.pos.y >= below_y);
        if !removed.is_empty() {
            log::debug!("Culled {} platform(s) below {below_y:.1}", removed.len());
        }
        removed
    }
}

/// One elliptical puff of a cloud
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bubble {
    pub offset: Vec2,
    pub size: Vec2,
}

/// Decorative background cloud (no physics)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub bubbles: Vec<Bubble>,
    /// 0 → 1 over the fade-in
    pub alpha: f32,
    drift: Oscillator,
}

/// Clouds streamed ahead of the camera
#[derive(Debug, Clone)]
pub struct Backdrop {
    rng: Pcg32,
    pub clouds: Vec<Cloud>,
    next_spawn_y: f32,
}

impl Backdrop {
    pub fn new(seed: u64) -> Self {
        Self {
            // Separate stream so visuals never shift platform layout
            rng: Pcg32::new(seed, 0xda3e_39cb_94b9_5bdb),
            clouds: Vec::new(),
            next_spawn_y: 0.0,
        }
    }

    pub fn reset(&mut self, start_y: f32) {
        self.clouds.clear();
        self.next_spawn_y = start_y;
    }

    pub fn spawn_up_to(&mut self, target_y: f32, playfield: &Playfield) {
        let capped = target_y + CLOUD_LOOKAHEAD;
        while self.next_spawn_y < capped {
            let cloud = self.make_cloud(self.next_spawn_y, playfield);
            self.clouds.push(cloud);
            self.next_spawn_y += self.rng.random_range(CLOUD_SPACING_MIN..=CLOUD_SPACING_MAX);
        }
    }

    fn make_cloud(&mut self, y: f32, playfield: &Playfield) -> Cloud {
        let rng = &mut self.rng;
        let count = rng.random_range(3..=5);
        let base_width: f32 = rng.random_range(160.0..=280.0);
        let base_height = base_width * rng.random_range(0.4..=0.55);
        let spread = base_width * 0.45;
        let bubbles = (0..count)
            .map(|i| Bubble {
                offset: Vec2::new(
                    rng.random_range(-spread..=spread),
                    rng.random_range(-base_height * 0.2..=base_height * 0.2) - (i % 2) as f32 * 6.0,
                ),
                size: Vec2::new(
                    base_width * rng.random_range(0.45..=0.7),
                    base_height * rng.random_range(0.55..=0.85),
                ),
            })
            .collect();

        let reach = playfield.width() / 2.2;
        let pos = Vec2::new(
            rng.random_range(-reach..=reach),
            y + rng.random_range(-60.0..=60.0),
        );
        let distance: f32 = rng.random_range(50.0..=100.0);
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let duration = rng.random_range(14.0..=20.0);
        let away = pos + Vec2::new(distance * direction, rng.random_range(-12.0..=12.0));

        Cloud {
            pos,
            bubbles,
            alpha: 0.0,
            drift: Oscillator::new(pos, away, pos, duration, duration),
        }
    }

    /// Drift and fade in
    pub fn advance(&mut self, dt: f32) {
        for cloud in &mut self.clouds {
            cloud.pos = cloud.drift.advance(dt);
            cloud.alpha = (cloud.alpha + dt / CLOUD_FADE_IN).min(1.0);
        }
    }

    pub fn cull(&mut self, below_y: f32) {
        self.clouds.retain(|c| c.pos.y >= below_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(seed: u64) -> (PlatformGenerator, PlatformSet) {
        let mut generator = PlatformGenerator::new(seed, Playfield::default());
        let mut platforms = PlatformSet::new();
        generator.build_starting(&mut platforms, 0);
        (generator, platforms)
    }

    fn sorted_ys(platforms: &PlatformSet) -> Vec<f32> {
        let mut ys: Vec<f32> = platforms.iter().map(|(_, p)| p.base.y).collect();
        ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        ys
    }

    #[test]
    fn test_starting_layout() {
        let (generator, platforms) = fresh(1);
        assert_eq!(platforms.len(), 3);
        assert_eq!(generator.created(), 3);
        assert_eq!(sorted_ys(&platforms), vec![-20.0, 40.0, 110.0]);
        let gap = generator.frontier_y() - 110.0;
        assert!((PLATFORM_SPACING_MIN..=PLATFORM_SPACING_MAX).contains(&gap));
    }

    #[test]
    fn test_extend_spacing_and_bounds() {
        let (mut generator, mut platforms) = fresh(42);
        generator.extend(&mut platforms, 5_000.0, 0, false);
        assert!(generator.frontier_y() >= 5_000.0);

        let ys = sorted_ys(&platforms);
        for pair in ys.windows(2).skip(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= PLATFORM_SPACING_MIN - 1e-3 && gap <= PLATFORM_SPACING_MAX + 1e-3);
        }

        let playfield = Playfield::default();
        for (_, p) in platforms.iter() {
            assert!(p.width >= PLATFORM_MIN_WIDTH && p.width <= PLATFORM_MAX_WIDTH);
            let (min_x, max_x) = playfield.x_range(p.width / 2.0, PLATFORM_SIDE_MARGIN);
            assert!(p.base.x >= min_x - 1e-3 && p.base.x <= max_x + 1e-3);
        }
    }

    #[test]
    fn test_every_fifth_platform_moves() {
        let (mut generator, mut platforms) = fresh(9);
        generator.extend(&mut platforms, 3_000.0, 0, false);
        for (_, p) in platforms.iter() {
            assert_eq!(p.is_moving(), p.index % MOVING_PLATFORM_INTERVAL == 0, "index {}", p.index);
        }
    }

    #[test]
    fn test_forced_extend_spawns_once_when_satisfied() {
        let (mut generator, mut platforms) = fresh(3);
        let before = platforms.len();
        assert_eq!(generator.extend(&mut platforms, -1_000.0, 0, true), 1);
        assert_eq!(platforms.len(), before + 1);
        assert_eq!(generator.extend(&mut platforms, -1_000.0, 0, false), 0);
    }

    #[test]
    fn test_cull_is_idempotent() {
        let (mut generator, mut platforms) = fresh(5);
        generator.extend(&mut platforms, 1_000.0, 0, false);
        let first = generator.cull(&mut platforms, 300.0);
        assert!(!first.is_empty());
        assert!(platforms.iter().all(|(_, p)| p.pos.y >= 300.0));
        assert!(generator.cull(&mut platforms, 300.0).is_empty());
    }

    #[test]
    fn test_cull_empty_set() {
        let generator = PlatformGenerator::new(1, Playfield::default());
        let mut platforms = PlatformSet::new();
        assert!(generator.cull(&mut platforms, 0.0).is_empty());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let (mut g1, mut p1) = fresh(77);
        let (mut g2, mut p2) = fresh(77);
        g1.extend(&mut p1, 2_000.0, 0, false);
        g2.extend(&mut p2, 2_000.0, 0, false);
        let a: Vec<Vec2> = p1.iter().map(|(_, p)| p.base).collect();
        let b: Vec<Vec2> = p2.iter().map(|(_, p)| p.base).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_backdrop_streams_and_culls() {
        let playfield = Playfield::default();
        let mut backdrop = Backdrop::new(11);
        backdrop.reset(50.0);
        backdrop.spawn_up_to(1_000.0, &playfield);
        assert!(!backdrop.clouds.is_empty());

        backdrop.advance(10.0);
        assert!(backdrop.clouds.iter().all(|c| c.alpha == 1.0));

        backdrop.cull(10_000.0);
        assert!(backdrop.clouds.is_empty());
    }
}
