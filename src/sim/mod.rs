//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod entity;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod store;
pub mod tick;

pub use collision::{entities_overlap, shapes_overlap};
pub use effects::{Effects, Explosion};
pub use entity::{Entity, EntityId, EntityKind, Role, Shape};
pub use physics::{CollisionReport, Hazard, HazardCause, Kill, Physics, PhysicsParams};
pub use spawner::{SpawnRequest, SpawnSchedule, Spawner, WaveCleared};
pub use state::{DamageOutcome, GamePhase, GameState, SessionRules, Transition};
pub use store::{EntityStore, EntityTemplate, Templates};
pub use tick::{Command, TickInput, World, tick};
