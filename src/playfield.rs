//! Playfield dimensions, validated once at world construction

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Startup configuration problems. Nothing at runtime produces these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("playfield size must be finite and positive, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("playfield width {width} cannot fit a platform; need at least {min}")]
    TooNarrow { width: f32, min: f32 },
}

/// Visible play area centered on x = 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    width: f32,
    height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLAYFIELD_WIDTH,
            height: DEFAULT_PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    /// Smallest width that still leaves room for the widest platform
    pub const MIN_WIDTH: f32 = PLATFORM_MAX_WIDTH + 2.0 * PLATFORM_SIDE_MARGIN;

    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::InvalidSize { width, height });
        }
        if width < Self::MIN_WIDTH {
            return Err(ConfigError::TooNarrow {
                width,
                min: Self::MIN_WIDTH,
            });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Range of x centers for an object of `half_width` kept `margin` from the edges
    pub fn x_range(&self, half_width: f32, margin: f32) -> (f32, f32) {
        let min = -self.half_width() + half_width + margin;
        let max = self.half_width() - half_width - margin;
        (min, max)
    }
}
