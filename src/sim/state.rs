//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::carrier::Carry;
use super::generator::{Backdrop, PlatformGenerator};
use super::motion::{MotionKind, MotionParams, Oscillator};
use super::physics::{Aabb, Body, BodyId, Category, PhysicsWorld, StaticBody};
use super::platforms::PlatformSet;
use crate::approach;
use crate::consts::*;
use crate::playfield::{ConfigError, Playfield};

/// The climbing character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    /// Number of ground-category surfaces currently touched
    pub ground_contacts: u32,
    /// Sim time of the last accepted jump
    pub last_jump_time: Option<f64>,
    /// Sim time of the last ground contact begin, or of losing the last one
    pub last_ground_contact_time: Option<f64>,
    /// Moving platform currently transporting the player
    pub carrying: Option<Carry>,
}

impl Player {
    pub fn spawn() -> Self {
        Self {
            body: Body::new(PLAYER_SPAWN, PLAYER_SIZE),
            facing: 1.0,
            ground_contacts: 0,
            last_jump_time: None,
            last_ground_contact_time: None,
            carrying: None,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.body.vel
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.ground_contacts > 0
    }

    /// Grounded, or lost ground contact less than the grace window ago
    pub fn grounded_recently(&self, now: f64) -> bool {
        self.is_grounded()
            || self
                .last_ground_contact_time
                .is_some_and(|t| now - t < CARRY_GRACE)
    }

    /// Seconds since the last jump (infinite if never jumped)
    pub fn time_since_jump(&self, now: f64) -> f64 {
        self.last_jump_time.map_or(f64::INFINITY, |t| now - t)
    }
}

/// A platform (static or oscillating)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub width: f32,
    pub height: f32,
    /// Spawn position
    pub base: Vec2,
    /// Current center position
    pub pos: Vec2,
    /// Motion actually running
    pub kind: MotionKind,
    /// Difficulty frozen at spawn (None for static platforms)
    pub params: Option<MotionParams>,
    motion: Option<Oscillator>,
    /// Player has passed above this platform
    pub scored: bool,
    /// 1-based creation index within the current run
    pub index: u32,
}

impl Platform {
    /// A platform that never moves
    pub fn fixed(width: f32, pos: Vec2) -> Self {
        Self {
            width,
            height: PLATFORM_HEIGHT,
            base: pos,
            pos,
            kind: MotionKind::Static,
            params: None,
            motion: None,
            scored: false,
            index: 0,
        }
    }

    /// A platform following `motion`
    pub fn oscillating(
        width: f32,
        pos: Vec2,
        kind: MotionKind,
        params: MotionParams,
        motion: Oscillator,
    ) -> Self {
        Self {
            kind,
            params: Some(params),
            motion: Some(motion),
            ..Self::fixed(width, pos)
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size())
    }

    /// Move along the oscillation path
    pub fn advance(&mut self, dt: f32) {
        if let Some(motion) = &mut self.motion {
            self.pos = motion.advance(dt);
        }
    }

    /// Flip `scored` false→true. Returns false if it was already scored.
    pub fn mark_scored(&mut self) -> bool {
        if self.scored {
            return false;
        }
        self.scored = true;
        true
    }
}

/// Static world volumes: ground strip, side walls and the kill-zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surfaces {
    pub ground: Aabb,
    pub walls: [Aabb; 2],
    pub kill_zone: Aabb,
}

impl Surfaces {
    pub fn new(playfield: &Playfield, camera_y: f32) -> Self {
        let ground = Aabb::from_center(
            Vec2::new(0.0, GROUND_Y),
            Vec2::new(playfield.width() * 2.0, GROUND_HEIGHT),
        );
        let mut surfaces = Self {
            ground,
            walls: [ground; 2],
            kill_zone: ground,
        };
        surfaces.place_walls(playfield, camera_y);
        surfaces.kill_zone = Self::kill_zone_at(playfield, Self::kill_zone_target(playfield, camera_y));
        surfaces
    }

    fn kill_zone_target(playfield: &Playfield, camera_y: f32) -> f32 {
        camera_y - playfield.height() / 2.0 - KILL_ZONE_OFFSET
    }

    fn kill_zone_at(playfield: &Playfield, y: f32) -> Aabb {
        Aabb::from_center(
            Vec2::new(0.0, y),
            Vec2::new(playfield.width() * 2.0, KILL_ZONE_HEIGHT),
        )
    }

    fn place_walls(&mut self, playfield: &Playfield, camera_y: f32) {
        let size = Vec2::new(WALL_WIDTH, playfield.height() * 4.0);
        let x = playfield.half_width() - WALL_INSET;
        self.walls = [
            Aabb::from_center(Vec2::new(-x, camera_y), size),
            Aabb::from_center(Vec2::new(x, camera_y), size),
        ];
    }

    /// Walls follow the camera; the kill-zone follows it up but never down
    pub fn follow_camera(&mut self, playfield: &Playfield, camera_y: f32) {
        self.place_walls(playfield, camera_y);
        let target = Self::kill_zone_target(playfield, camera_y);
        if target > self.kill_zone_y() {
            self.kill_zone = Self::kill_zone_at(playfield, target);
        }
    }

    #[inline]
    pub fn kill_zone_y(&self) -> f32 {
        self.kill_zone.center().y
    }
}

/// Vertical-follow camera
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    pub fn follow(&mut self, target_y: f32) {
        self.pos.y = approach(self.pos.y, target_y, CAMERA_LERP);
        self.pos.x = 0.0;
    }
}

/// Score keeping for the current run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    pub current_score: u32,
    /// Never decreases within a process
    pub high_score: u32,
    /// -1, 0 or +1 from the input mapper
    pub move_direction: f32,
    /// Completed respawns
    pub runs: u32,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RespawnReason {
    /// Touched the kill-zone
    Hazard,
    /// Dropped below the kill-zone between contact checks
    OutOfBounds,
    /// Restart key
    Restart,
}

/// Things the outside world may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Landed,
    PlatformScored { score: u32 },
    NewHighScore { score: u32 },
    /// A run with a positive score ended and should be recorded
    RunFinished { score: u32 },
    Respawned { reason: RespawnReason },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub playfield: Playfield,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub platforms: PlatformSet,
    pub generator: PlatformGenerator,
    pub backdrop: Backdrop,
    pub surfaces: Surfaces,
    pub camera: Camera,
    pub physics: PhysicsWorld,
    pub run: RunState,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed, starting from a known high score
    pub fn new(seed: u64, playfield: Playfield, high_score: u32) -> Self {
        let mut state = Self {
            seed,
            playfield,
            time: 0.0,
            time_ticks: 0,
            player: Player::spawn(),
            platforms: PlatformSet::new(),
            generator: PlatformGenerator::new(seed, playfield),
            backdrop: Backdrop::new(seed),
            surfaces: Surfaces::new(&playfield, PLAYER_SPAWN.y),
            camera: Camera { pos: PLAYER_SPAWN },
            physics: PhysicsWorld::new(),
            run: RunState {
                high_score,
                ..Default::default()
            },
            events: Vec::new(),
        };
        super::run::reset_world(&mut state);
        state
    }

    /// Validate raw dimensions and build the state
    pub fn with_dimensions(
        seed: u64,
        width: f32,
        height: f32,
        high_score: u32,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(seed, Playfield::new(width, height)?, high_score))
    }

    /// Every static box for this physics step
    pub fn static_bodies(&self) -> Vec<StaticBody> {
        let mut bodies = Vec::with_capacity(self.platforms.len() + 4);
        bodies.push(StaticBody {
            id: BodyId::Ground,
            category: Category::Ground,
            aabb: self.surfaces.ground,
        });
        for (i, wall) in self.surfaces.walls.iter().enumerate() {
            bodies.push(StaticBody {
                id: BodyId::Wall(i as u8),
                category: Category::Wall,
                aabb: *wall,
            });
        }
        bodies.push(StaticBody {
            id: BodyId::Hazard,
            category: Category::Hazard,
            aabb: self.surfaces.kill_zone,
        });
        bodies.extend(self.platforms.iter().map(|(handle, p)| StaticBody {
            id: BodyId::Platform(handle),
            category: Category::Ground,
            aabb: p.aabb(),
        }));
        bodies
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
