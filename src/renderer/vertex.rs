//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Raw bytes for uploading a vertex buffer
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.24, 0.31, 0.52, 1.0];
    /// Ground strip and walls
    pub const SKYLINE: [f32; 4] = [0.32, 0.41, 0.63, 1.0];
    pub const PLATFORM: [f32; 4] = [0.55, 0.64, 0.86, 1.0];
    pub const MOVING_PLATFORM: [f32; 4] = [0.68, 0.76, 0.94, 1.0];
    pub const PLAYER: [f32; 4] = [0.12, 0.1, 0.16, 1.0];
    /// Player's facing marker
    pub const PLAYER_EYE: [f32; 4] = [0.94, 0.97, 1.0, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const HUD_TEXT: [f32; 4] = [0.94, 0.97, 1.0, 0.95];
    pub const SCORE_TEXT: [f32; 4] = [1.0, 0.91, 0.72, 1.0];
}
