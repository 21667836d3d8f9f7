//! Game state and phase machine
//!
//! Session-wide values (score, lives, wave, phase) live in one owned
//! [`GameState`] that the tick passes explicitly to each subsystem.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::physics::{CollisionReport, HazardCause};
use super::store::EntityStore;
use super::tick::TickInput;
use crate::Settings;
use crate::error::SimError;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start command
    Intro,
    /// Active gameplay
    Playing,
    /// Simulation frozen, input still sampled
    Paused,
    /// Run ended, waiting for a restart command
    GameOver,
}

/// Phase changes triggered by commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Intro -> Playing; the caller must rebuild the world
    Started,
    Paused,
    Resumed,
    /// GameOver -> Intro
    Restarted,
}

/// Per-session rules the state machine enforces on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRules {
    pub starting_lives: u32,
    /// Ticks after game over during which restart is ignored
    pub restart_lockout_ticks: u32,
    pub kill_score: u64,
    pub boss_kill_score: u64,
}

impl SessionRules {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            starting_lives: settings.starting_lives,
            restart_lockout_ticks: settings.restart_lockout_ticks,
            kill_score: settings.kill_score,
            boss_kill_score: settings.boss.kill_score,
        }
    }
}

impl Default for SessionRules {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Session state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Current wave (1-based once a session has started)
    pub wave: u32,
    /// Ticks spent in Playing this session
    pub elapsed_ticks: u64,
    /// Game-over ticks left before restart is accepted
    pub restart_lockout: u32,
    pub rules: SessionRules,
}

impl GameState {
    pub fn new(rules: SessionRules) -> Self {
        Self {
            phase: GamePhase::Intro,
            score: 0,
            lives: rules.starting_lives,
            wave: 0,
            elapsed_ticks: 0,
            restart_lockout: 0,
            rules,
        }
    }

    /// Apply this tick's commands to the phase machine.
    ///
    /// At most one transition happens per tick; commands that make no sense
    /// in the current phase are dropped. Each GameOver tick also counts the
    /// restart lockout down, and restart is honored only once it reaches 0.
    pub fn handle_input(&mut self, input: &TickInput) -> Option<Transition> {
        if self.phase == GamePhase::GameOver {
            self.restart_lockout = self.restart_lockout.saturating_sub(1);
        }

        match self.phase {
            GamePhase::Intro if input.start => {
                self.reset();
                Some(Transition::Started)
            }
            GamePhase::Playing if input.pause => {
                self.phase = GamePhase::Paused;
                Some(Transition::Paused)
            }
            GamePhase::Paused if input.pause => {
                self.phase = GamePhase::Playing;
                Some(Transition::Resumed)
            }
            GamePhase::GameOver if input.restart && self.restart_lockout == 0 => {
                self.phase = GamePhase::Intro;
                Some(Transition::Restarted)
            }
            phase => {
                if input.start || input.restart {
                    log::debug!("Ignoring session command in {phase:?}");
                }
                None
            }
        }
    }

    /// Fresh session values, entering Playing
    fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = self.rules.starting_lives;
        self.wave = 1;
        self.elapsed_ticks = 0;
        self.restart_lockout = 0;
    }

    /// Move on to the next wave after the current one is cleared
    pub fn advance_wave(&mut self) {
        self.wave += 1;
        log::info!("Wave {} begins (score {})", self.wave, self.score);
    }

    /// Cost the player a life for `source` and remove it.
    ///
    /// Shared by breaches, player contact and enemy shots; `source` is the
    /// enemy or the enemy bullet. Returns `true` when this was the last life
    /// and the phase moved to GameOver.
    pub fn apply_damage(
        &mut self,
        store: &mut EntityStore,
        source: EntityId,
    ) -> Result<bool, SimError> {
        if self.phase != GamePhase::Playing {
            return Err(SimError::InvalidState {
                operation: "apply_damage",
                phase: self.phase,
            });
        }
        store.mark_dead(source)?;

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.restart_lockout = self.rules.restart_lockout_ticks;
            log::info!("Game over at wave {} with score {}", self.wave, self.score);
            return Ok(true);
        }
        Ok(false)
    }

    /// Damage-application step: award bullet kills, then charge hazards.
    ///
    /// Each hazard source is charged at most once per tick. Once the last
    /// life is lost, remaining hazards are left untouched.
    pub fn apply_collisions(
        &mut self,
        store: &mut EntityStore,
        report: &CollisionReport,
    ) -> DamageOutcome {
        let mut outcome = DamageOutcome::default();
        for kill in &report.kills {
            self.score += if kill.boss {
                log::info!("Boss {} destroyed", kill.enemy);
                self.rules.boss_kill_score
            } else {
                self.rules.kill_score
            };
            outcome.dead_enemies.push(kill.enemy);
        }
        outcome.dead_enemies.extend(&report.culled_enemies);

        let mut charged = BTreeSet::new();
        for hazard in &report.hazards {
            if self.phase != GamePhase::Playing {
                break;
            }
            if !charged.insert(hazard.source) {
                continue;
            }
            match self.apply_damage(store, hazard.source) {
                Ok(game_over) => {
                    outcome.lives_lost += 1;
                    outcome.game_over |= game_over;
                    let what = match hazard.cause {
                        HazardCause::Breach => "breached the line",
                        HazardCause::Contact => "rammed the player",
                        HazardCause::Shot => "shot the player",
                    };
                    log::debug!("Entity {} {what}", hazard.source);
                    if hazard.cause != HazardCause::Shot {
                        outcome.dead_enemies.push(hazard.source);
                    }
                }
                Err(e) => {
                    e.report();
                    outcome.quarantine.push(hazard.source);
                }
            }
        }
        outcome
    }
}

/// What the damage-application step did this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Enemies that died this tick by any cause, in resolution order
    pub dead_enemies: Vec<EntityId>,
    pub lives_lost: u32,
    pub game_over: bool,
    /// Entities whose damage step failed; compaction skips them this tick
    pub quarantine: Vec<EntityId>,
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::entity::{EntityKind, Role};
    use crate::sim::physics::{Hazard, Kill};
    use crate::sim::tick::Command;

    fn cmd(command: Command) -> TickInput {
        TickInput::default().with(command)
    }

    fn playing() -> GameState {
        let mut state = GameState::new(SessionRules::default());
        state.handle_input(&cmd(Command::Start));
        state
    }

    fn enemies(store: &mut EntityStore, n: usize) -> Vec<EntityId> {
        (0..n)
            .map(|_| {
                store
                    .create(GamePhase::Playing, EntityKind::Enemy, Vec2::ZERO, Vec2::ZERO)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_phase_cycle() {
        let mut state = GameState::new(SessionRules::default());
        assert_eq!(state.phase, GamePhase::Intro);

        // Pause does nothing in Intro
        assert_eq!(state.handle_input(&cmd(Command::Pause)), None);

        assert_eq!(state.handle_input(&cmd(Command::Start)), Some(Transition::Started));
        assert_eq!((state.score, state.lives, state.wave), (0, 3, 1));

        assert_eq!(state.handle_input(&cmd(Command::Pause)), Some(Transition::Paused));
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.handle_input(&cmd(Command::Pause)), Some(Transition::Resumed));
        assert_eq!(state.phase, GamePhase::Playing);

        // Restart is only honored from GameOver
        assert_eq!(state.handle_input(&cmd(Command::Restart)), None);
        state.phase = GamePhase::GameOver;
        assert_eq!(state.handle_input(&cmd(Command::Restart)), Some(Transition::Restarted));
        assert_eq!(state.phase, GamePhase::Intro);
    }

    #[test]
    fn test_restart_locked_out_after_game_over() {
        let rules = SessionRules {
            starting_lives: 1,
            restart_lockout_ticks: 5,
            ..Default::default()
        };
        let mut state = GameState::new(rules);
        state.handle_input(&cmd(Command::Start));
        let mut store = EntityStore::default();
        let enemy = enemies(&mut store, 1)[0];

        assert_eq!(state.apply_damage(&mut store, enemy), Ok(true));
        assert_eq!(state.restart_lockout, 5);

        for _ in 0..4 {
            assert_eq!(state.handle_input(&cmd(Command::Restart)), None);
            assert_eq!(state.phase, GamePhase::GameOver);
        }
        assert_eq!(state.handle_input(&cmd(Command::Restart)), Some(Transition::Restarted));
        assert_eq!(state.phase, GamePhase::Intro);
    }

    #[test]
    fn test_apply_damage_forces_game_over() {
        let mut state = playing();
        let mut store = EntityStore::default();
        let ids = enemies(&mut store, 3);

        assert_eq!(state.apply_damage(&mut store, ids[0]), Ok(false));
        assert_eq!(state.apply_damage(&mut store, ids[1]), Ok(false));
        assert_eq!(state.apply_damage(&mut store, ids[2]), Ok(true));
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(store.count(EntityKind::Enemy), 0);
    }

    #[test]
    fn test_apply_damage_outside_playing_is_invalid() {
        let mut state = GameState::new(SessionRules::default());
        let mut store = EntityStore::default();
        let err = state.apply_damage(&mut store, 1).unwrap_err();
        assert!(matches!(err, SimError::InvalidState { .. }));
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_apply_collisions_charges_each_enemy_once() {
        let mut state = playing();
        let mut store = EntityStore::default();
        let enemy = enemies(&mut store, 1)[0];
        let report = CollisionReport {
            hazards: vec![
                Hazard {
                    source: enemy,
                    cause: HazardCause::Breach,
                },
                Hazard {
                    source: enemy,
                    cause: HazardCause::Contact,
                },
            ],
            ..Default::default()
        };

        let outcome = state.apply_collisions(&mut store, &report);
        assert_eq!(outcome.lives_lost, 1);
        assert_eq!(outcome.dead_enemies, vec![enemy]);
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_apply_collisions_scores_kills_only() {
        let mut state = playing();
        let mut store = EntityStore::default();
        let kill = |bullet, enemy, boss| Kill { bullet, enemy, boss };
        let report = CollisionReport {
            kills: vec![kill(1, 2, false), kill(3, 4, true)],
            culled_enemies: vec![5],
            ..Default::default()
        };

        let outcome = state.apply_collisions(&mut store, &report);
        assert_eq!(state.score, state.rules.kill_score + state.rules.boss_kill_score);
        assert_eq!(state.lives, 3);
        assert_eq!(outcome.dead_enemies, vec![2, 4, 5]);
    }

    #[test]
    fn test_enemy_shot_costs_a_life_but_no_enemy() {
        let mut state = playing();
        let mut store = EntityStore::default();
        let bullet = store
            .create_as(GamePhase::Playing, EntityKind::Bullet, Role::Hostile, Vec2::ZERO, Vec2::Y)
            .unwrap();
        let report = CollisionReport {
            hazards: vec![Hazard {
                source: bullet,
                cause: HazardCause::Shot,
            }],
            ..Default::default()
        };

        let outcome = state.apply_collisions(&mut store, &report);
        assert_eq!(outcome.lives_lost, 1);
        assert!(outcome.dead_enemies.is_empty());
        assert!(!store.get(bullet).unwrap().alive);
        assert_eq!(state.lives, 2);
    }
}
