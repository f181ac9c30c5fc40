//! Axis-aligned box physics
//!
//! Only the player is dynamic. Everything else (ground, walls, platforms,
//! kill-zone) is a static box handed in fresh each step, so moving platforms
//! are just static boxes that happen to be somewhere else next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platforms::PlatformHandle;
use crate::consts::*;

/// Penetration below this is treated as touching, not overlapping
const SKIN: f32 = 0.01;
/// Boxes closer than this still count as in contact
const CONTACT_SLOP: f32 = 0.5;

/// Collision categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    /// Ground strip and every platform
    Ground,
    Wall,
    Hazard,
}

impl Category {
    pub const fn bit(self) -> u32 {
        match self {
            Category::Player => 1 << 0,
            Category::Ground => 1 << 1,
            Category::Wall => 1 << 2,
            Category::Hazard => 1 << 3,
        }
    }
}

/// Categories the player is physically pushed out of
pub const PLAYER_COLLISION_MASK: u32 = Category::Ground.bit() | Category::Wall.bit();
/// Categories that report contact events against the player
pub const PLAYER_CONTACT_MASK: u32 = Category::Ground.bit() | Category::Hazard.bit();

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Overlap depth on each axis (negative = gap)
    #[inline]
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    /// True if the boxes overlap by more than `-slop` on both axes
    #[inline]
    pub fn touches(&self, other: &Aabb, slop: f32) -> bool {
        let p = self.penetration(other);
        p.x > -slop && p.y > -slop
    }

    #[inline]
    fn overlaps(&self, other: &Aabb) -> bool {
        let p = self.penetration(other);
        p.x > SKIN && p.y > SKIN
    }
}

/// Identity of a static collision volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyId {
    Ground,
    /// 0 = left, 1 = right
    Wall(u8),
    Hazard,
    Platform(PlatformHandle),
}

/// A static box taking part in one physics step
#[derive(Debug, Clone, Copy)]
pub struct StaticBody {
    pub id: BodyId,
    pub category: Category,
    pub aabb: Aabb,
}

impl StaticBody {
    #[inline]
    fn is_solid(&self) -> bool {
        self.category.bit() & PLAYER_COLLISION_MASK != 0
    }

    #[inline]
    fn reports_contact(&self) -> bool {
        self.category.bit() & PLAYER_CONTACT_MASK != 0
    }
}

/// The dynamic body (position is the box center)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    #[inline]
    fn half(&self) -> Vec2 {
        self.size / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// Contact between the player and a static body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub body: BodyId,
    pub category: Category,
}

/// Fixed-timestep integrator for the player body
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    /// Vertical acceleration (units/s²)
    pub gravity: f32,
    pub max_rise_speed: f32,
    pub max_fall_speed: f32,
    pub max_horizontal_speed: f32,
    pub linear_damping: f32,
    /// Bodies currently in contact with the player, in discovery order
    touching: Vec<(BodyId, Category)>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self {
            gravity: GRAVITY * GRAVITY_SCALE,
            max_rise_speed: MAX_RISE_SPEED,
            max_fall_speed: MAX_FALL_SPEED,
            max_horizontal_speed: MOVE_SPEED,
            linear_damping: LINEAR_DAMPING,
            touching: Vec::new(),
        }
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bodies in contact after the last step
    pub fn touching(&self) -> &[(BodyId, Category)] {
        &self.touching
    }

    /// Forget all contacts without emitting end events (world rebuilt)
    pub fn reset_contacts(&mut self) {
        self.touching.clear();
    }

    /// Advance the body by `dt` (semi-implicit Euler), resolve against solid
    /// statics one axis at a time and report contact changes.
    pub fn step(&mut self, body: &mut Body, statics: &[StaticBody], dt: f32) -> Vec<ContactEvent> {
        body.vel.y += self.gravity * dt;
        body.vel *= (1.0 - self.linear_damping * dt).max(0.0);
        self.clamp_velocity(body);

        // Move X first, then Y (separate axis resolution). Each pass only
        // resolves solids this axis moved into; boxes that were already
        // overlapping (a platform moved onto the player) go to depenetrate.
        let before = body.aabb();
        let dx = body.vel.x * dt;
        body.pos.x += dx;
        for solid in statics.iter().filter(|s| s.is_solid()) {
            if before.overlaps(&solid.aabb) || !body.aabb().overlaps(&solid.aabb) {
                continue;
            }
            if dx > 0.0 {
                body.pos.x = solid.aabb.min.x - body.half().x;
                body.vel.x = 0.0;
            } else if dx < 0.0 {
                body.pos.x = solid.aabb.max.x + body.half().x;
                body.vel.x = 0.0;
            }
        }

        let before = body.aabb();
        let dy = body.vel.y * dt;
        body.pos.y += dy;
        for solid in statics.iter().filter(|s| s.is_solid()) {
            if before.overlaps(&solid.aabb) || !body.aabb().overlaps(&solid.aabb) {
                continue;
            }
            if dy < 0.0 {
                // Falling, land on top
                body.pos.y = solid.aabb.max.y + body.half().y;
                body.vel.y = 0.0;
            } else if dy > 0.0 {
                // Rising, head bonk
                body.pos.y = solid.aabb.min.y - body.half().y;
                body.vel.y = 0.0;
            }
        }

        self.depenetrate(body, statics);
        self.update_contacts(body, statics)
    }

    fn clamp_velocity(&self, body: &mut Body) {
        body.vel.x = body
            .vel
            .x
            .clamp(-self.max_horizontal_speed, self.max_horizontal_speed);
        body.vel.y = body.vel.y.clamp(self.max_fall_speed, self.max_rise_speed);
    }

    /// Push out of anything still overlapping along the shallower axis
    fn depenetrate(&self, body: &mut Body, statics: &[StaticBody]) {
        for solid in statics.iter().filter(|s| s.is_solid()) {
            let aabb = body.aabb();
            if !aabb.overlaps(&solid.aabb) {
                continue;
            }
            let pen = aabb.penetration(&solid.aabb);
            let away = body.pos - solid.aabb.center();
            if pen.x < pen.y {
                let sign = if away.x >= 0.0 { 1.0 } else { -1.0 };
                body.pos.x += pen.x * sign;
                if body.vel.x * sign < 0.0 {
                    body.vel.x = 0.0;
                }
            } else {
                let sign = if away.y >= 0.0 { 1.0 } else { -1.0 };
                body.pos.y += pen.y * sign;
                if body.vel.y * sign < 0.0 {
                    body.vel.y = 0.0;
                }
            }
        }
    }

    fn update_contacts(&mut self, body: &Body, statics: &[StaticBody]) -> Vec<ContactEvent> {
        let bounds = body.aabb();
        let now: Vec<(BodyId, Category)> = statics
            .iter()
            .filter(|s| s.reports_contact() && bounds.touches(&s.aabb, CONTACT_SLOP))
            .map(|s| (s.id, s.category))
            .collect();

        let mut events = Vec::new();
        for &(body, category) in &self.touching {
            if !now.iter().any(|&(id, _)| id == body) {
                events.push(ContactEvent {
                    phase: ContactPhase::End,
                    body,
                    category,
                });
            }
        }
        for &(body, category) in &now {
            if !self.touching.iter().any(|&(id, _)| id == body) {
                events.push(ContactEvent {
                    phase: ContactPhase::Begin,
                    body,
                    category,
                });
            }
        }

        self.touching = now;
        events
    }
}
