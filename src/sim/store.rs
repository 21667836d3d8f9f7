//! Entity store with deferred deletion
//!
//! Entities live in one `Vec` per kind, each kept in ascending id order.
//! Ids are allocated monotonically so pushing preserves the order, and every
//! iteration the simulation does is therefore stable by id.
//!
//! Nothing is removed while subsystems run: `mark_dead` only flags, and
//! `compact` (once per tick, last) is the only operation that shrinks the
//! containers.

use glam::Vec2;

use super::entity::{Entity, EntityId, EntityKind, Role, Shape};
use super::state::GamePhase;
use crate::error::SimError;

/// Shape and health assigned to each kind and role on creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTemplate {
    pub shape: Shape,
    pub health: i32,
}

/// Templates used by [`EntityStore::create_as`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Templates {
    pub player: EntityTemplate,
    pub bullet: EntityTemplate,
    pub enemy: EntityTemplate,
    pub hostile_bullet: EntityTemplate,
    pub boss: EntityTemplate,
}

impl Templates {
    pub fn from_settings(settings: &crate::Settings) -> Self {
        Self {
            player: EntityTemplate {
                shape: Shape::Aabb {
                    half_extents: Vec2::new(
                        settings.player_half_width,
                        settings.player_half_height,
                    ),
                },
                health: 1,
            },
            bullet: EntityTemplate {
                shape: Shape::Circle {
                    radius: settings.bullet_radius,
                },
                health: 1,
            },
            enemy: EntityTemplate {
                shape: Shape::Circle {
                    radius: settings.enemy_radius,
                },
                health: 1,
            },
            hostile_bullet: EntityTemplate {
                shape: Shape::Circle {
                    radius: settings.enemy_fire.bullet_radius,
                },
                health: 1,
            },
            boss: EntityTemplate {
                shape: Shape::Circle {
                    radius: settings.boss.radius,
                },
                health: settings.boss.health,
            },
        }
    }

    /// Roles that make no sense for a kind fall back to the kind's template
    fn get(&self, kind: EntityKind, role: Role) -> EntityTemplate {
        match (kind, role) {
            (EntityKind::Bullet, Role::Hostile) => self.hostile_bullet,
            (EntityKind::Enemy, Role::Boss) => self.boss,
            (EntityKind::Player, _) => self.player,
            (EntityKind::Bullet, _) => self.bullet,
            (EntityKind::Enemy, _) => self.enemy,
        }
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::from_settings(&crate::Settings::default())
    }
}

/// Owner of every entity in the session
#[derive(Debug, Clone)]
pub struct EntityStore {
    partitions: [Vec<Entity>; 3],
    templates: Templates,
    next_id: EntityId,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(Templates::default())
    }
}

impl EntityStore {
    pub fn new(templates: Templates) -> Self {
        Self {
            partitions: [Vec::new(), Vec::new(), Vec::new()],
            templates,
            next_id: 1,
        }
    }

    /// Allocate a fresh entity with the standard role.
    ///
    /// Bullets and enemies may only be created while `phase` is Playing; the
    /// player can be created at any time (session start happens outside it).
    pub fn create(
        &mut self,
        phase: GamePhase,
        kind: EntityKind,
        pos: Vec2,
        vel: Vec2,
    ) -> Result<EntityId, SimError> {
        self.create_as(phase, kind, Role::Standard, pos, vel)
    }

    /// Like [`create`](Self::create), with shape and health taken from the
    /// role's template
    pub fn create_as(
        &mut self,
        phase: GamePhase,
        kind: EntityKind,
        role: Role,
        pos: Vec2,
        vel: Vec2,
    ) -> Result<EntityId, SimError> {
        if kind != EntityKind::Player && phase != GamePhase::Playing {
            return Err(SimError::InvalidState {
                operation: "create",
                phase,
            });
        }

        let template = self.templates.get(kind, role);
        let id = self.next_id;
        self.next_id += 1;
        self.partitions[kind.index()].push(Entity {
            id,
            kind,
            role,
            pos,
            vel,
            shape: template.shape,
            health: template.health,
            alive: true,
        });
        Ok(id)
    }

    /// Flag an entity for removal at the next compaction. Idempotent.
    pub fn mark_dead(&mut self, id: EntityId) -> Result<(), SimError> {
        let entity = self.get_mut(id).ok_or(SimError::OutOfBounds(id))?;
        entity.alive = false;
        Ok(())
    }

    /// Remove every dead entity, returning how many were removed
    pub fn compact(&mut self) -> usize {
        self.compact_retaining(&[])
    }

    /// Like [`compact`](Self::compact) but leaves the quarantined ids in place
    /// until a later compaction.
    pub fn compact_retaining(&mut self, quarantine: &[EntityId]) -> usize {
        let mut removed = 0;
        for partition in &mut self.partitions {
            let before = partition.len();
            partition.retain(|e| e.alive || quarantine.contains(&e.id));
            removed += before - partition.len();
        }
        removed
    }

    /// Remove every entity; the id counter keeps running
    pub fn clear(&mut self) {
        for partition in &mut self.partitions {
            partition.clear();
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.partitions.iter().find_map(|p| {
            p.binary_search_by_key(&id, |e| e.id)
                .ok()
                .map(|index| &p[index])
        })
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        for partition in &mut self.partitions {
            if let Ok(index) = partition.binary_search_by_key(&id, |e| e.id) {
                return Some(&mut partition[index]);
            }
        }
        None
    }

    /// Live entities of a kind in ascending id order. The iterator is
    /// `Clone`, so a sequence can be restarted from the beginning.
    pub fn iter(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> + Clone {
        self.partitions[kind.index()].iter().filter(|e| e.alive)
    }

    /// Every entity still held by the store, dead or alive, by kind then id
    pub fn iter_all(&self) -> impl Iterator<Item = &Entity> {
        self.partitions.iter().flatten()
    }

    /// Ids of the live entities of a kind at call time
    pub fn live_ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.iter(kind).map(|e| e.id).collect()
    }

    /// Visit the live entities of a kind as of call time.
    ///
    /// The id set is fixed when the call starts; each entity is looked up
    /// again before the visit, so changes made by earlier visits are seen and
    /// entities killed mid-visit are skipped.
    pub fn for_each<F>(&mut self, kind: EntityKind, mut f: F)
    where
        F: FnMut(&mut Entity),
    {
        for id in self.live_ids(kind) {
            if let Some(entity) = self.get_mut(id).filter(|e| e.alive) {
                f(entity);
            }
        }
    }

    /// Number of live entities of a kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.iter(kind).count()
    }

    /// Number of entities held, including ones awaiting compaction
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The live player entity, if any
    pub fn player(&self) -> Option<&Entity> {
        self.iter(EntityKind::Player).next()
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.partitions[EntityKind::Player.index()]
            .iter_mut()
            .find(|e| e.alive)
    }
}
