//! Skyhop - an endless vertical platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, streaming, carrier, run state)
//! - `input`: Key events to movement/jump/restart intents
//! - `renderer`: Frame snapshots and draw lists for a render collaborator
//! - `persistence`: High score and scoreboard storage
//! - `settings`: User configuration
//! - `game`: Fixed-timestep driver tying the pieces together

pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod playfield;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::Scoreboard;
pub use input::{Action, InputMapper, KeyBindings};
pub use playfield::{ConfigError, Playfield};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz frame loop)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World gravity (vertical, in world units)
    pub const GRAVITY: f32 = -3.2;
    /// Points per world unit; gravity acceleration is GRAVITY * GRAVITY_SCALE
    pub const GRAVITY_SCALE: f32 = 150.0;
    /// Velocity decay per second applied to the player body
    pub const LINEAR_DAMPING: f32 = 0.22;

    /// Horizontal movement
    pub const MOVE_SPEED: f32 = 165.0;
    /// Fraction of the gap to target velocity closed per tick
    pub const GROUND_ACCELERATION: f32 = 0.28;
    pub const AIR_ACCELERATION: f32 = 0.12;

    /// Vertical limits
    pub const JUMP_IMPULSE: f32 = 350.0;
    pub const MAX_RISE_SPEED: f32 = 350.0;
    pub const MAX_FALL_SPEED: f32 = -260.0;

    /// Edge jump: allowed mid-air while moving fast sideways and not falling hard
    pub const EDGE_JUMP_MIN_VY: f32 = -30.0;
    pub const EDGE_JUMP_MIN_VX: f32 = 10.0;
    /// Minimum seconds between two jumps for an edge jump
    pub const EDGE_JUMP_COOLDOWN: f64 = 0.08;

    /// Player box and spawn point
    pub const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 34.0);
    pub const PLAYER_SPAWN: Vec2 = Vec2::new(0.0, -90.0);

    /// Platform dimensions
    pub const PLATFORM_HEIGHT: f32 = 16.0;
    pub const PLATFORM_MIN_WIDTH: f32 = 90.0;
    pub const PLATFORM_MAX_WIDTH: f32 = 150.0;
    /// Gap kept between a spawned platform and the playfield edge
    pub const PLATFORM_SIDE_MARGIN: f32 = 40.0;
    /// Vertical distance between consecutive generated platforms
    pub const PLATFORM_SPACING_MIN: f32 = 90.0;
    pub const PLATFORM_SPACING_MAX: f32 = 130.0;
    /// Generate platforms up to player Y + this
    pub const SPAWN_MARGIN: f32 = 220.0;
    /// Cull platforms below camera Y - this
    pub const CLEANUP_MARGIN: f32 = 300.0;
    /// Every Nth created platform moves
    pub const MOVING_PLATFORM_INTERVAL: u32 = 5;

    /// Moving platforms keep this far from the playfield edge
    pub const MOTION_PADDING: f32 = 24.0;
    /// Travel spans shorter than this fall back to a static platform
    pub const MIN_TRAVEL_SPAN: f32 = 12.0;
    /// Shortest time for one oscillation leg (seconds)
    pub const MIN_LEG_DURATION: f32 = 0.7;

    /// Player must be this far above a platform to score it
    pub const SCORE_MARGIN: f32 = 8.0;

    /// Carrier: contact loss tolerated for this long (seconds)
    pub const CARRY_GRACE: f64 = 0.12;
    /// Carrier: vertical speed above which the player is jumping/falling
    pub const CARRY_RELEASE_SPEED: f32 = 80.0;

    /// Camera eases toward the player by this fraction per tick
    pub const CAMERA_LERP: f32 = 0.18;
    /// Kill-zone sits this far below the bottom of the view
    pub const KILL_ZONE_OFFSET: f32 = 60.0;
    pub const KILL_ZONE_HEIGHT: f32 = 20.0;

    /// Static world surfaces
    pub const GROUND_Y: f32 = -140.0;
    pub const GROUND_HEIGHT: f32 = 60.0;
    pub const WALL_WIDTH: f32 = 16.0;
    pub const WALL_INSET: f32 = 16.0;

    /// Facing flips only past this move-direction magnitude
    pub const FACING_DEADZONE: f32 = 0.1;

    /// Background clouds
    pub const CLOUD_SPACING_MIN: f32 = 160.0;
    pub const CLOUD_SPACING_MAX: f32 = 240.0;
    pub const CLOUD_LOOKAHEAD: f32 = 200.0;
    pub const CLOUD_FADE_IN: f32 = 1.6;
    pub const CLOUD_ALPHA: f32 = 0.22;

    /// Default window-sized playfield
    pub const DEFAULT_PLAYFIELD_WIDTH: f32 = 520.0;
    pub const DEFAULT_PLAYFIELD_HEIGHT: f32 = 360.0;
}

/// Move `current` toward `target` by `fraction` of the remaining gap
#[inline]
pub fn approach(current: f32, target: f32, fraction: f32) -> f32 {
    current + (target - current) * fraction
}
