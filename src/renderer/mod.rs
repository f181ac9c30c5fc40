//! Render boundary
//!
//! The simulation is drawn by an external collaborator. Each tick it gets a
//! read-only [`FrameSnapshot`] of world-space positions and sizes, and can
//! ask for a camera-relative triangle list to upload as-is.

pub mod shapes;
pub mod vertex;

use std::io::Write;

use glam::Vec2;
use serde::Serialize;

pub use vertex::{Vertex, colors};

use crate::consts::CLOUD_ALPHA;
use crate::sim::GameState;

const CLOUD_SEGMENTS: u32 = 20;
/// Inset of HUD labels from the view edges
const HUD_MARGIN: f32 = 20.0;
/// Key help shown along the top of the view
pub const HELP_TEXT: &str = "←/A left • →/D right • Space jump • R restart • I demo • Q quit";

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectView {
    pub center: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub rect: RectView,
    pub facing: f32,
    pub grounded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlatformView {
    pub rect: RectView,
    /// Drawn with the moving tint
    pub moving: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudView {
    pub bubbles: Vec<RectView>,
    pub alpha: f32,
}

/// A line of HUD text anchored in camera space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelView {
    pub text: String,
    pub anchor: Vec2,
    pub color: [f32; 4],
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub camera: Vec2,
    pub view_size: Vec2,
    pub player: PlayerView,
    pub platforms: Vec<PlatformView>,
    pub ground: RectView,
    pub walls: [RectView; 2],
    pub clouds: Vec<CloudView>,
    pub kill_zone_y: f32,
    pub score: u32,
    pub high_score: u32,
    pub hud: String,
    /// Clear color for the frame
    pub background: [f32; 4],
    pub labels: Vec<LabelView>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let rect = |aabb: crate::sim::Aabb| RectView {
            center: aabb.center(),
            size: aabb.size(),
        };

        let player = &state.player;
        let platforms = state
            .platforms
            .iter()
            .map(|(_, p)| PlatformView {
                rect: rect(p.aabb()),
                moving: p.is_moving(),
            })
            .collect();
        let clouds = state
            .backdrop
            .clouds
            .iter()
            .map(|c| CloudView {
                bubbles: c
                    .bubbles
                    .iter()
                    .map(|b| RectView {
                        center: c.pos + b.offset,
                        size: b.size,
                    })
                    .collect(),
                alpha: c.alpha,
            })
            .collect();

        let view_size = Vec2::new(state.playfield.width(), state.playfield.height());
        let hud = hud_line(state.run.current_score, state.run.high_score);

        Self {
            tick: state.time_ticks,
            camera: state.camera.pos,
            view_size,
            player: PlayerView {
                rect: rect(player.body.aabb()),
                facing: player.facing,
                grounded: player.is_grounded(),
            },
            platforms,
            ground: rect(state.surfaces.ground),
            walls: state.surfaces.walls.map(rect),
            clouds,
            kill_zone_y: state.surfaces.kill_zone_y(),
            score: state.run.current_score,
            high_score: state.run.high_score,
            labels: hud_labels(&hud, view_size),
            hud,
            background: colors::BACKGROUND,
        }
    }

    /// Triangle list in camera space (camera at the origin), back to front
    pub fn tessellate(&self) -> Vec<Vertex> {
        let to_view = |p: Vec2| p - self.camera;
        let mut vertices = Vec::new();

        for cloud in &self.clouds {
            let color = shapes::with_alpha(colors::CLOUD, CLOUD_ALPHA * cloud.alpha);
            for bubble in &cloud.bubbles {
                vertices.extend(shapes::ellipse(
                    to_view(bubble.center),
                    bubble.size,
                    color,
                    CLOUD_SEGMENTS,
                ));
            }
        }

        vertices.extend(shapes::rect(to_view(self.ground.center), self.ground.size, colors::SKYLINE));
        for wall in &self.walls {
            vertices.extend(shapes::rect(to_view(wall.center), wall.size, colors::SKYLINE));
        }

        for platform in &self.platforms {
            let color = if platform.moving {
                colors::MOVING_PLATFORM
            } else {
                colors::PLATFORM
            };
            vertices.extend(shapes::rect(
                to_view(platform.rect.center),
                platform.rect.size,
                color,
            ));
        }

        let body = self.player.rect;
        vertices.extend(shapes::rect(to_view(body.center), body.size, colors::PLAYER));
        let eye = body.center + Vec2::new(self.player.facing * body.size.x * 0.25, body.size.y * 0.2);
        vertices.extend(shapes::rect(to_view(eye), Vec2::splat(4.0), colors::PLAYER_EYE));

        vertices
    }
}

/// The score readout shown in the corner
pub fn hud_line(score: u32, high_score: u32) -> String {
    format!("Score: {score}  High: {high_score}")
}

/// Key help along the top edge and the score readout in the bottom-left corner
fn hud_labels(hud: &str, view_size: Vec2) -> Vec<LabelView> {
    let half = view_size / 2.0;
    vec![
        LabelView {
            text: HELP_TEXT.to_string(),
            anchor: Vec2::new(0.0, half.y - HUD_MARGIN),
            color: colors::HUD_TEXT,
        },
        LabelView {
            text: hud.to_string(),
            anchor: Vec2::new(-half.x + HUD_MARGIN, -half.y + HUD_MARGIN),
            color: colors::SCORE_TEXT,
        },
    ]
}

/// Consumer of frames, implemented by whatever draws the game
pub trait FrameSink {
    fn present(&mut self, frame: &FrameSnapshot);
}

/// Writes each frame as one JSON line
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &FrameSnapshot) {
        let written = serde_json::to_writer(&mut self.out, frame)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        if let Err(err) = written {
            log::warn!("Dropping frame {}: {err}", frame.tick);
        }
    }
}
