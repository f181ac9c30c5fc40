//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by platform slot)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod carrier;
pub mod generator;
pub mod motion;
pub mod physics;
pub mod platforms;
pub mod run;
pub mod state;
pub mod tick;

pub use carrier::Carry;
pub use generator::{Backdrop, Cloud, PlatformGenerator, STARTING_PLATFORMS};
pub use motion::{MotionKind, MotionParams, Oscillator, motion_kind, motion_params};
pub use physics::{Aabb, Body, BodyId, Category, ContactEvent, ContactPhase, PhysicsWorld};
pub use platforms::{PlatformHandle, PlatformSet};
pub use state::{Camera, GameEvent, GameState, Platform, Player, RespawnReason, RunState, Surfaces};
pub use tick::{TickInput, facing_for, tick};
