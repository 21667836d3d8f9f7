//! Entity data shared by every simulation subsystem
//!
//! One flat record for all kinds; behavior switches on [`EntityKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque entity id, allocated monotonically and never reused in a session
pub type EntityId = u64;

/// Entity kinds (also the partition key of the store)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Bullet,
    Enemy,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Player, EntityKind::Bullet, EntityKind::Enemy];

    /// Index of this kind's partition
    #[inline]
    pub fn index(self) -> usize {
        match self {
            EntityKind::Player => 0,
            EntityKind::Bullet => 1,
            EntityKind::Enemy => 2,
        }
    }
}

/// Variant within a kind.
///
/// Enemy-fired bullets are `Bullet`s that hurt the player and pass through
/// enemies; a boss is an `Enemy` with more health, a bigger shape and its own
/// kill value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Standard,
    /// Bullet fired by an enemy
    Hostile,
    Boss,
}

/// Bounding shape used for collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned box centered on the entity position
    Aabb { half_extents: Vec2 },
}

impl Shape {
    /// Half-size of the shape's axis-aligned bounds
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Aabb { half_extents } => half_extents,
        }
    }
}

/// A simulated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    pub health: i32,
    /// Cleared by `mark_dead`; the entity leaves the store at compaction
    pub alive: bool,
}

impl Entity {
    #[inline]
    pub fn is_hostile_bullet(&self) -> bool {
        self.kind == EntityKind::Bullet && self.role == Role::Hostile
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.kind == EntityKind::Enemy && self.role == Role::Boss
    }

    /// Radius of the bounding circle, or the larger box half-extent
    #[inline]
    pub fn radius(&self) -> f32 {
        self.shape.half_extents().max_element()
    }

    /// Lowest y covered by the bounding shape (screen coordinates, y down)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.shape.half_extents().y
    }
}
