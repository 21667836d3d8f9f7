//! Immutable per-tick view of the simulation handed to renderers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{
    Effects, EntityId, EntityKind, EntityStore, Explosion, GamePhase, GameState, Role, Shape,
};

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: EntityId,
    pub kind: EntityKind,
    pub role: Role,
    pub pos: Vec2,
    pub shape: Shape,
}

/// Everything a renderer may draw for one completed tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// World tick this snapshot was taken after
    pub tick: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub wave: u32,
    pub elapsed_ticks: u64,
    /// Game-over ticks left before a restart is accepted
    pub restart_lockout: u32,
    /// Best finished run this session, if any
    pub best_score: Option<u64>,
    pub playfield: Vec2,
    pub defense_line_y: f32,
    /// Live entities, player first, then bullets, then enemies (each by id)
    pub sprites: Vec<Sprite>,
    /// Explosions still animating, oldest first
    pub explosions: Vec<Explosion>,
}

impl RenderSnapshot {
    pub fn capture(
        tick: u64,
        state: &GameState,
        store: &EntityStore,
        effects: &Effects,
        settings: &Settings,
        best_score: Option<u64>,
    ) -> Self {
        let sprites = EntityKind::ALL
            .into_iter()
            .flat_map(|kind| store.iter(kind))
            .map(|e| Sprite {
                id: e.id,
                kind: e.kind,
                role: e.role,
                pos: e.pos,
                shape: e.shape,
            })
            .collect();

        Self {
            tick,
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            wave: state.wave,
            elapsed_ticks: state.elapsed_ticks,
            restart_lockout: state.restart_lockout,
            best_score,
            playfield: Vec2::new(settings.playfield_width, settings.playfield_height),
            defense_line_y: settings.defense_line_y,
            sprites,
            explosions: effects.explosions().to_vec(),
        }
    }

    /// Sprites of one kind
    pub fn sprites_of(&self, kind: EntityKind) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(move |s| s.kind == kind)
    }

    /// True while a restart command would still be refused
    pub fn restart_locked(&self) -> bool {
        self.phase == GamePhase::GameOver && self.restart_lockout > 0
    }

    pub fn player(&self) -> Option<&Sprite> {
        self.sprites_of(EntityKind::Player).next()
    }
}
