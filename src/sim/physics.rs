//! Movement, bounds culling, and collision resolution
//!
//! One call to [`Physics::step`] per Playing tick:
//! 1. steer and integrate every live entity, then handle the fire command
//! 2. cull bullets/enemies outside the playfield, detect breaches
//! 3. player bullets vs enemies (ascending id on both sides), then player vs
//!    enemies, then enemy bullets vs player
//!
//! Bullet kills are resolved here; life loss is left to the damage step,
//! which receives the [`CollisionReport`].

use glam::Vec2;

use super::collision::{entities_overlap, in_bounds};
use super::entity::{EntityId, EntityKind};
use super::state::GamePhase;
use super::store::EntityStore;
use super::tick::TickInput;
use crate::Settings;

/// Why the player loses a life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardCause {
    /// Enemy crossed the defense line
    Breach,
    /// Enemy overlapped the player
    Contact,
    /// Enemy bullet hit the player
    Shot,
}

/// One life-costing event; `source` is the enemy, or the bullet for a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hazard {
    pub source: EntityId,
    pub cause: HazardCause,
}

/// An enemy destroyed by a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill {
    pub bullet: EntityId,
    pub enemy: EntityId,
    pub boss: bool,
}

/// Everything the collision pass found this tick, in resolution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub kills: Vec<Kill>,
    pub hazards: Vec<Hazard>,
    /// Enemies that left the playfield (no penalty)
    pub culled_enemies: Vec<EntityId>,
    pub bullets_fired: u32,
    /// Bullets spent on an enemy another bullet already destroyed this tick
    pub wasted_bullets: u32,
}

/// Physics tuning pulled from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    pub dt: f32,
    pub width: f32,
    pub height: f32,
    pub defense_line_y: f32,
    pub player_speed: f32,
    pub bullet_speed: f32,
    pub fire_cooldown_ticks: u32,
}

impl PhysicsParams {
    pub fn from_settings(settings: &Settings, dt: f32) -> Self {
        Self {
            dt,
            width: settings.playfield_width,
            height: settings.playfield_height,
            defense_line_y: settings.defense_line_y,
            player_speed: settings.player_speed,
            bullet_speed: settings.bullet_speed,
            fire_cooldown_ticks: settings.fire_cooldown_ticks,
        }
    }
}

/// Physics/collision engine; the only state it keeps is the fire cooldown
#[derive(Debug, Clone)]
pub struct Physics {
    params: PhysicsParams,
    fire_cooldown: u32,
}

impl Physics {
    pub fn new(params: PhysicsParams) -> Self {
        Self {
            params,
            fire_cooldown: 0,
        }
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Forget per-session state (new session)
    pub fn reset(&mut self) {
        self.fire_cooldown = 0;
    }

    /// Advance one tick
    pub fn step(
        &mut self,
        store: &mut EntityStore,
        phase: GamePhase,
        input: &TickInput,
    ) -> CollisionReport {
        let mut report = CollisionReport::default();

        self.integrate(store, input);
        self.fire(store, phase, input, &mut report);
        let breached = self.cull_and_breach(store, &mut report);
        resolve_bullets(store, &breached, &mut report);
        resolve_player_contact(store, &breached, &mut report);
        resolve_enemy_fire(store, &mut report);

        report
    }

    fn integrate(&self, store: &mut EntityStore, input: &TickInput) {
        let p = self.params;

        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        let steer = Vec2::new(
            axis(input.move_left, input.move_right),
            axis(input.move_up, input.move_down),
        );
        if let Some(player) = store.player_mut() {
            // Diagonals are no faster than straight moves
            player.vel = steer.normalize_or_zero() * p.player_speed;
        }

        for kind in EntityKind::ALL {
            store.for_each(kind, |e| {
                e.pos += e.vel * p.dt;
                if e.kind == EntityKind::Player {
                    // The player is kept on the field rather than culled
                    let half = e.shape.half_extents();
                    e.pos.x = clamp_inside(e.pos.x, half.x, p.width);
                    e.pos.y = clamp_inside(e.pos.y, half.y, p.height);
                } else if e.is_boss() {
                    // Bosses sweep from wall to wall on the way down
                    let r = e.radius();
                    if (e.pos.x < r && e.vel.x < 0.0) || (e.pos.x > p.width - r && e.vel.x > 0.0) {
                        e.vel.x = -e.vel.x;
                    }
                    e.pos.x = clamp_inside(e.pos.x, r, p.width);
                }
            });
        }
    }

    fn fire(
        &mut self,
        store: &mut EntityStore,
        phase: GamePhase,
        input: &TickInput,
        report: &mut CollisionReport,
    ) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        if !input.fire || self.fire_cooldown > 0 {
            return;
        }
        let Some(player) = store.player() else {
            return;
        };

        let muzzle = player.pos - Vec2::new(0.0, player.shape.half_extents().y);
        let vel = Vec2::new(0.0, -self.params.bullet_speed);
        match store.create(phase, EntityKind::Bullet, muzzle, vel) {
            Ok(id) => {
                self.fire_cooldown = self.params.fire_cooldown_ticks;
                report.bullets_fired += 1;
                log::trace!("Bullet {id} fired from {muzzle}");
            }
            Err(e) => e.report(),
        }
    }

    /// Cull out-of-bounds bullets/enemies and collect breaching enemies.
    /// Returns the breached ids (ascending) so later passes skip them.
    fn cull_and_breach(
        &self,
        store: &mut EntityStore,
        report: &mut CollisionReport,
    ) -> Vec<EntityId> {
        let p = self.params;
        let mut breached = Vec::new();

        for id in store.live_ids(EntityKind::Bullet) {
            if store.get(id).is_some_and(|e| !in_bounds(e.pos, p.width, p.height)) {
                kill(store, id);
            }
        }

        for id in store.live_ids(EntityKind::Enemy) {
            let Some((pos, bottom)) = store.get(id).map(|e| (e.pos, e.bottom())) else {
                continue;
            };
            if !in_bounds(pos, p.width, p.height) {
                kill(store, id);
                report.culled_enemies.push(id);
            } else if bottom >= p.defense_line_y {
                breached.push(id);
                report.hazards.push(Hazard {
                    source: id,
                    cause: HazardCause::Breach,
                });
            }
        }

        breached
    }
}

/// Keep `v` at least `margin` inside `[0, extent]`; centered when it cannot fit
fn clamp_inside(v: f32, margin: f32, extent: f32) -> f32 {
    v.clamp(margin.min(extent / 2.0), (extent - margin).max(extent / 2.0))
}

/// Player bullets in ascending id order each damage the first live enemy
/// they overlap. A bullet whose only overlaps are enemies already destroyed
/// this tick is consumed anyway. Enemy bullets pass through enemies.
fn resolve_bullets(store: &mut EntityStore, breached: &[EntityId], report: &mut CollisionReport) {
    let enemies: Vec<EntityId> = store
        .live_ids(EntityKind::Enemy)
        .into_iter()
        .filter(|id| breached.binary_search(id).is_err())
        .collect();

    for bullet_id in store.live_ids(EntityKind::Bullet) {
        let Some(bullet) = store.get(bullet_id).filter(|b| !b.is_hostile_bullet()).cloned() else {
            continue;
        };

        let mut target = None;
        let mut overlapped_dead = false;
        for &enemy_id in &enemies {
            let Some(enemy) = store.get(enemy_id) else {
                continue;
            };
            if entities_overlap(&bullet, enemy) {
                if enemy.alive {
                    target = Some(enemy_id);
                    break;
                }
                overlapped_dead = true;
            }
        }

        match target {
            Some(enemy_id) => {
                kill(store, bullet_id);
                let destroyed = store.get_mut(enemy_id).and_then(|enemy| {
                    enemy.health -= 1;
                    (enemy.health <= 0).then_some(enemy.is_boss())
                });
                if let Some(boss) = destroyed {
                    kill(store, enemy_id);
                    report.kills.push(Kill {
                        bullet: bullet_id,
                        enemy: enemy_id,
                        boss,
                    });
                }
            }
            None if overlapped_dead => {
                kill(store, bullet_id);
                report.wasted_bullets += 1;
            }
            None => {}
        }
    }
}

fn resolve_player_contact(
    store: &mut EntityStore,
    breached: &[EntityId],
    report: &mut CollisionReport,
) {
    let Some(player) = store.player().cloned() else {
        return;
    };
    for enemy in store.iter(EntityKind::Enemy) {
        if breached.binary_search(&enemy.id).is_ok() {
            continue;
        }
        if entities_overlap(&player, enemy) {
            report.hazards.push(Hazard {
                source: enemy.id,
                cause: HazardCause::Contact,
            });
        }
    }
}

/// Enemy bullets touching the player. The bullet is consumed by the damage
/// step, not here.
fn resolve_enemy_fire(store: &mut EntityStore, report: &mut CollisionReport) {
    let Some(player) = store.player().cloned() else {
        return;
    };
    for bullet in store.iter(EntityKind::Bullet) {
        if bullet.is_hostile_bullet() && entities_overlap(&player, bullet) {
            report.hazards.push(Hazard {
                source: bullet.id,
                cause: HazardCause::Shot,
            });
        }
    }
}

fn kill(store: &mut EntityStore, id: EntityId) {
    if let Err(e) = store.mark_dead(id) {
        e.report();
    }
}
