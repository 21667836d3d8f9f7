//! Fixed timestep simulation tick
//!
//! One call to [`tick`] advances the world by exactly one `SIM_DT` step in a
//! fixed order: input/state transitions, spawner, physics and collisions,
//! damage application, compaction, snapshot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use super::entity::{EntityId, EntityKind};
use super::physics::{CollisionReport, Physics, PhysicsParams};
use super::spawner::Spawner;
use super::state::{GamePhase, GameState, SessionRules, Transition};
use super::store::{EntityStore, Templates};
use crate::consts::SIM_DT;
use crate::error::SimError;
use crate::highscores::HighScores;
use crate::renderer::RenderSnapshot;
use crate::settings::Settings;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Begin a session from the intro screen
    pub start: bool,
    /// Return to the intro screen after game over
    pub restart: bool,
    /// Stop the frame loop at the next tick boundary
    pub quit: bool,
}

/// A single abstract command, as produced by an input adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Fire,
    Pause,
    Start,
    Restart,
    Quit,
}

impl TickInput {
    /// Add one command to the set
    pub fn with(mut self, command: Command) -> Self {
        match command {
            Command::MoveLeft => self.move_left = true,
            Command::MoveRight => self.move_right = true,
            Command::MoveUp => self.move_up = true,
            Command::MoveDown => self.move_down = true,
            Command::Fire => self.fire = true,
            Command::Pause => self.pause = true,
            Command::Start => self.start = true,
            Command::Restart => self.restart = true,
            Command::Quit => self.quit = true,
        }
        self
    }
}

impl FromIterator<Command> for TickInput {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        iter.into_iter().fold(TickInput::default(), TickInput::with)
    }
}

/// Everything the simulation owns
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub state: GameState,
    pub store: EntityStore,
    pub spawner: Spawner,
    pub physics: Physics,
    pub effects: Effects,
    /// Best finished runs this process has seen
    pub high_scores: HighScores,
    /// Ticks executed since the world was created, in any phase
    ticks: u64,
    sessions: u64,
    snapshot: RenderSnapshot,
}

impl World {
    pub fn new(settings: Settings) -> Self {
        let state = GameState::new(SessionRules::from_settings(&settings));
        let store = EntityStore::new(Templates::from_settings(&settings));
        let effects = Effects::new(settings.explosion_ticks);
        let high_scores = HighScores::new();
        let snapshot = RenderSnapshot::capture(
            0,
            &state,
            &store,
            &effects,
            &settings,
            high_scores.top_score(),
        );
        Self {
            spawner: Spawner::new(&settings),
            physics: Physics::new(PhysicsParams::from_settings(&settings, SIM_DT)),
            settings,
            state,
            store,
            effects,
            high_scores,
            ticks: 0,
            sessions: 0,
            snapshot,
        }
    }

    /// Snapshot of the most recently completed tick
    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Create an enemy outside the spawn schedule and count it toward the
    /// current wave.
    pub fn spawn_enemy(&mut self, pos: Vec2, vel: Vec2) -> Result<EntityId, SimError> {
        let id = self
            .store
            .create(self.state.phase, EntityKind::Enemy, pos, vel)?;
        self.spawner.track_spawned(id, self.spawner.current_wave());
        Ok(id)
    }

    /// Rebuild the world for a new session: empty store plus one player
    fn start_session(&mut self) {
        self.store.clear();
        self.effects.clear();
        self.spawner.reset(self.sessions);
        self.physics.reset();
        self.sessions += 1;

        let pos = Vec2::new(self.settings.playfield_width / 2.0, self.settings.player_y);
        if let Err(e) = self
            .store
            .create(self.state.phase, EntityKind::Player, pos, Vec2::ZERO)
        {
            e.report();
        }
        log::info!(
            "Session {} started: {} lives, seed {}",
            self.sessions,
            self.state.lives,
            self.settings.seed
        );
    }

    /// Scheduled waves first, then enemy gunfire
    fn spawn_scheduled(&mut self) {
        let tick = self.state.elapsed_ticks;
        let mut requests = self.spawner.step(tick, &self.state);
        requests.extend(self.spawner.enemy_fire(tick, &self.store));

        for request in requests {
            let created = self.store.create_as(
                self.state.phase,
                request.kind,
                request.role,
                request.pos,
                request.vel,
            );
            match created {
                Ok(id) => {
                    if let Some(entity) = self.store.get_mut(id) {
                        entity.health = request.health;
                    }
                    if request.kind == EntityKind::Enemy {
                        self.spawner.track_spawned(id, request.wave);
                    }
                }
                Err(e) => e.report(),
            }
        }
    }

    /// Leave an explosion where each destroyed enemy was
    fn explode_kills(&mut self, report: &CollisionReport) {
        for kill in &report.kills {
            if let Some(enemy) = self.store.get(kill.enemy) {
                self.effects.explode(enemy.pos, enemy.radius(), kill.boss);
            }
        }
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    world.ticks += 1;

    match world.state.handle_input(input) {
        Some(Transition::Started) => world.start_session(),
        Some(Transition::Restarted) => {
            world.effects.clear();
            log::info!("Restarted at tick {}", world.ticks);
        }
        Some(transition) => log::info!("{transition:?} at tick {}", world.ticks),
        None => {}
    }

    // Paused and Intro freeze everything below except compaction; explosions
    // keep playing out on the game-over screen
    let mut quarantine = Vec::new();
    match world.state.phase {
        GamePhase::Playing => {
            world.state.elapsed_ticks += 1;

            world.spawn_scheduled();

            let report = world.physics.step(&mut world.store, world.state.phase, input);

            let outcome = world.state.apply_collisions(&mut world.store, &report);
            quarantine = outcome.quarantine;

            world.effects.step();
            world.explode_kills(&report);

            if outcome.game_over {
                let rank = world
                    .high_scores
                    .add_score(world.state.score, world.state.wave, world.ticks);
                if let Some(rank) = rank {
                    log::info!("Score {} ranks #{rank} this session", world.state.score);
                }
            } else {
                for id in outcome.dead_enemies {
                    if let Some(cleared) = world.spawner.record_enemy_death(id) {
                        log::debug!("Wave {} cleared", cleared.wave);
                        world.state.advance_wave();
                    }
                }
            }
        }
        GamePhase::GameOver => world.effects.step(),
        GamePhase::Intro | GamePhase::Paused => {}
    }

    world.store.compact_retaining(&quarantine);

    world.snapshot = RenderSnapshot::capture(
        world.ticks,
        &world.state,
        &world.store,
        &world.effects,
        &world.settings,
        world.high_scores.top_score(),
    );
}
