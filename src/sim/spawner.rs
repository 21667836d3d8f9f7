//! Time-driven enemy spawning under a decaying difficulty schedule
//!
//! A wave is one group of enemies released together along the top edge.
//! Waves are released purely on the schedule's timer, so they may overlap;
//! every release shortens the interval down to a floor. Each released wave
//! keeps its own live counter, and a wave is cleared once every enemy it
//! released is confirmed dead.
//!
//! The spawner also owns the seeded RNG, so enemy gunfire is decided here
//! and injected as hostile bullets.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind, Role};
use super::state::{GamePhase, GameState};
use super::store::EntityStore;
use crate::Settings;
use crate::consts::ENEMY_MAX_HEALTH;
use crate::settings::{BossSettings, EnemyFireSettings, SpawnSettings};

/// Spawn timing, owned by the [`Spawner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    pub next_spawn_tick: u64,
    pub interval_ticks: u32,
    pub enemies_per_wave: u32,
}

/// One entity the tick should create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: EntityKind,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    /// Wave an enemy counts toward (0 for bullets)
    pub wave: u32,
}

/// Every enemy of `wave` is confirmed dead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveCleared {
    pub wave: u32,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    tuning: SpawnSettings,
    fire: EnemyFireSettings,
    boss: BossSettings,
    playfield_width: f32,
    enemy_radius: f32,
    enemy_speed: f32,
    enemy_speed_growth: f32,
    seed: u64,
    rng: Pcg32,
    schedule: SpawnSchedule,
    /// Waves released this session
    released: u32,
    /// Live enemies per wave; cleared waves are removed
    live: BTreeMap<u32, u32>,
    /// Wave of every tracked enemy
    members: BTreeMap<EntityId, u32>,
}

impl Spawner {
    pub fn new(settings: &Settings) -> Self {
        let tuning = settings.spawn.clone();
        Self {
            schedule: initial_schedule(&tuning),
            tuning,
            fire: settings.enemy_fire.clone(),
            boss: settings.boss.clone(),
            playfield_width: settings.playfield_width,
            enemy_radius: settings.enemy_radius,
            enemy_speed: settings.enemy_speed,
            enemy_speed_growth: settings.enemy_speed_growth,
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            released: 0,
            live: BTreeMap::new(),
            members: BTreeMap::new(),
        }
    }

    /// Restore the initial schedule for a new session.
    ///
    /// The RNG is reseeded from the run seed and the session number, so a
    /// given session always replays identically.
    pub fn reset(&mut self, session: u64) {
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(session));
        self.schedule = initial_schedule(&self.tuning);
        self.released = 0;
        self.live.clear();
        self.members.clear();
    }

    pub fn schedule(&self) -> &SpawnSchedule {
        &self.schedule
    }

    /// Number of waves released this session
    pub fn released_waves(&self) -> u32 {
        self.released
    }

    /// Wave that enemies created outside the schedule count toward
    pub fn current_wave(&self) -> u32 {
        self.released.max(1)
    }

    /// Enemies of `wave` not yet confirmed dead
    pub fn live_in_wave(&self, wave: u32) -> u32 {
        self.live.get(&wave).copied().unwrap_or(0)
    }

    /// Tracked enemies not yet confirmed dead, across all waves
    pub fn live_enemies(&self) -> u32 {
        self.live.values().sum()
    }

    /// How many enemies fit side by side along the top edge
    pub fn lane_count(&self) -> u32 {
        let lane_width = self.enemy_radius * 3.0;
        ((self.playfield_width / lane_width).floor() as u32).max(1)
    }

    fn is_boss_wave(&self, wave: u32) -> bool {
        self.boss.every_waves > 0 && wave % self.boss.every_waves == 0
    }

    /// Spawn requests for this tick (usually none)
    pub fn step(&mut self, tick: u64, state: &GameState) -> Vec<SpawnRequest> {
        if state.phase != GamePhase::Playing || tick < self.schedule.next_spawn_tick {
            return Vec::new();
        }

        self.released += 1;
        let wave = self.released;
        let requests = if self.is_boss_wave(wave) {
            vec![self.boss_entry(wave)]
        } else {
            let count = self.schedule.enemies_per_wave.min(self.lane_count());
            self.layout_wave(count, wave)
        };

        self.schedule.next_spawn_tick += u64::from(self.schedule.interval_ticks);
        let decayed = self.schedule.interval_ticks as f32 * self.tuning.interval_decay;
        self.schedule.interval_ticks =
            (decayed.floor() as u32).max(self.tuning.min_interval_ticks);

        log::debug!(
            "Wave {wave} released at tick {tick}: {} enemies, next interval {} ticks",
            requests.len(),
            self.schedule.interval_ticks
        );
        requests
    }

    /// Register an enemy actually created for `wave`
    pub fn track_spawned(&mut self, id: EntityId, wave: u32) {
        if self.members.insert(id, wave).is_none() {
            *self.live.entry(wave).or_insert(0) += 1;
        }
    }

    /// Register an enemy death; reports when that enemy's wave is cleared.
    ///
    /// Untracked ids are ignored. A wave that has not been released yet
    /// (enemies placed by hand before the first timer) is never reported.
    pub fn record_enemy_death(&mut self, id: EntityId) -> Option<WaveCleared> {
        let wave = self.members.remove(&id)?;
        let remaining = self.live.get_mut(&wave)?;
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            return None;
        }
        self.live.remove(&wave);
        if wave > self.released {
            return None;
        }

        self.schedule.enemies_per_wave = (self.schedule.enemies_per_wave
            + self.tuning.enemies_per_wave_growth)
            .min(self.tuning.max_enemies_per_wave.max(1));
        Some(WaveCleared { wave })
    }

    /// Hostile bullets enemies fire this tick.
    ///
    /// Ordinary enemies drop straight shots once the session is old enough;
    /// bosses aim at the player with some jitter, holding fire while too many
    /// enemy bullets are already in flight.
    pub fn enemy_fire(&mut self, tick: u64, store: &EntityStore) -> Vec<SpawnRequest> {
        let mut requests = Vec::new();
        let mut in_flight = store
            .iter(EntityKind::Bullet)
            .filter(|b| b.is_hostile_bullet())
            .count();
        let target = store.player().map(|p| p.pos);

        for enemy in store.iter(EntityKind::Enemy) {
            let muzzle = enemy.pos + Vec2::new(0.0, enemy.radius());
            if enemy.is_boss() {
                let Some(target) = target else {
                    continue;
                };
                if in_flight >= self.boss.max_shots || !self.roll(self.boss.fire_chance) {
                    continue;
                }
                let jitter = self.boss.aim_jitter;
                let aim = if jitter > 0.0 {
                    target
                        + Vec2::new(
                            self.rng.random_range(-jitter..=jitter),
                            self.rng.random_range(-jitter..=jitter),
                        )
                } else {
                    target
                };
                let dir = (aim - muzzle).try_normalize().unwrap_or(Vec2::Y);
                requests.push(hostile_bullet(muzzle, dir * self.boss.shot_speed));
                in_flight += 1;
            } else if tick >= self.fire.delay_ticks && self.roll(self.fire.chance) {
                requests.push(hostile_bullet(muzzle, Vec2::new(0.0, self.fire.bullet_speed)));
                in_flight += 1;
            }
        }
        requests
    }

    fn roll(&mut self, chance: f32) -> bool {
        chance > 0.0 && self.rng.random::<f32>() < chance
    }

    /// A lone boss entering at the top center, sweeping sideways
    fn boss_entry(&mut self, wave: u32) -> SpawnRequest {
        let sweep = if self.rng.random::<bool>() {
            self.boss.sweep_speed
        } else {
            -self.boss.sweep_speed
        };
        SpawnRequest {
            kind: EntityKind::Enemy,
            role: Role::Boss,
            pos: Vec2::new(self.playfield_width / 2.0, 0.0),
            vel: Vec2::new(sweep, self.boss.speed),
            health: self.boss.health,
            wave,
        }
    }

    /// Spread `count` enemies evenly across the top edge with seeded jitter
    fn layout_wave(&mut self, count: u32, wave: u32) -> Vec<SpawnRequest> {
        let wave_step = wave.saturating_sub(1);
        let speed = self.enemy_speed * (1.0 + self.enemy_speed_growth * wave_step as f32);
        let health = (1 + (wave_step / 5) as i32).min(ENEMY_MAX_HEALTH);

        let slot = self.playfield_width / count as f32;
        let min_x = self.enemy_radius;
        let max_x = self.playfield_width - self.enemy_radius;
        let jitter = self.tuning.lane_jitter.min(slot / 2.0 - self.enemy_radius).max(0.0);

        (0..count)
            .map(|lane| {
                let offset = if jitter > 0.0 {
                    self.rng.random_range(-jitter..=jitter)
                } else {
                    0.0
                };
                let x = ((lane as f32 + 0.5) * slot + offset).clamp(min_x, max_x);
                SpawnRequest {
                    kind: EntityKind::Enemy,
                    role: Role::Standard,
                    pos: Vec2::new(x, 0.0),
                    vel: Vec2::new(0.0, speed),
                    health,
                    wave,
                }
            })
            .collect()
    }
}

fn hostile_bullet(pos: Vec2, vel: Vec2) -> SpawnRequest {
    SpawnRequest {
        kind: EntityKind::Bullet,
        role: Role::Hostile,
        pos,
        vel,
        health: 1,
        wave: 0,
    }
}

fn initial_schedule(tuning: &SpawnSettings) -> SpawnSchedule {
    SpawnSchedule {
        next_spawn_tick: u64::from(tuning.first_spawn_delay_ticks),
        interval_ticks: tuning.interval_ticks,
        enemies_per_wave: tuning.enemies_per_wave,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SessionRules;
    use crate::sim::tick::TickInput;

    fn playing_state() -> GameState {
        let mut state = GameState::new(SessionRules::default());
        state.handle_input(&TickInput {
            start: true,
            ..Default::default()
        });
        state
    }

    #[test]
    fn test_waits_for_first_spawn_tick() {
        let settings = Settings::default();
        let mut spawner = Spawner::new(&settings);
        let state = playing_state();
        let due = u64::from(settings.spawn.first_spawn_delay_ticks);

        assert!(spawner.step(due - 1, &state).is_empty());
        let wave = spawner.step(due, &state);
        assert_eq!(wave.len() as u32, settings.spawn.enemies_per_wave);
        assert!(wave.iter().all(|r| r.pos.y == 0.0 && r.vel.y > 0.0 && r.wave == 1));
        assert!(wave.windows(2).all(|w| w[0].pos.x < w[1].pos.x));
        assert_eq!(spawner.released_waves(), 1);
    }

    #[test]
    fn test_no_spawn_outside_playing() {
        let mut spawner = Spawner::new(&Settings::default());
        let mut state = playing_state();
        state.phase = GamePhase::Paused;
        assert!(spawner.step(10_000, &state).is_empty());
        let interval = SpawnSettings::default().interval_ticks;
        assert_eq!(spawner.schedule().interval_ticks, interval);
    }

    #[test]
    fn test_waves_clear_independently() {
        let mut spawner = Spawner::new(&Settings::default());
        let state = playing_state();

        // Two overlapping waves
        spawner.step(spawner.schedule().next_spawn_tick, &state);
        spawner.step(spawner.schedule().next_spawn_tick, &state);
        spawner.track_spawned(10, 1);
        spawner.track_spawned(11, 1);
        spawner.track_spawned(20, 2);
        assert_eq!(spawner.live_enemies(), 3);

        assert_eq!(spawner.record_enemy_death(20), Some(WaveCleared { wave: 2 }));
        assert_eq!(spawner.record_enemy_death(10), None);
        assert_eq!(spawner.live_in_wave(1), 1);
        // Unknown or repeated ids change nothing
        assert_eq!(spawner.record_enemy_death(10), None);
        assert_eq!(spawner.record_enemy_death(99), None);
        assert_eq!(spawner.record_enemy_death(11), Some(WaveCleared { wave: 1 }));
        assert_eq!(
            spawner.schedule().enemies_per_wave,
            SpawnSettings::default().enemies_per_wave + 2
        );
    }

    #[test]
    fn test_unreleased_wave_never_clears() {
        let mut spawner = Spawner::new(&Settings::default());
        spawner.track_spawned(5, spawner.current_wave());
        assert_eq!(spawner.record_enemy_death(5), None);
        assert_eq!(spawner.live_enemies(), 0);
    }

    #[test]
    fn test_every_fifth_wave_is_a_boss() {
        let settings = Settings::default();
        let mut spawner = Spawner::new(&settings);
        let state = playing_state();

        let mut waves = Vec::new();
        for _ in 0..settings.boss.every_waves {
            waves.push(spawner.step(spawner.schedule().next_spawn_tick, &state));
        }
        let (last, earlier) = waves.split_last().unwrap();
        assert!(earlier.iter().flatten().all(|r| r.role == Role::Standard));

        assert_eq!(last.len(), 1);
        let boss = last[0];
        assert_eq!(boss.role, Role::Boss);
        assert_eq!(boss.health, settings.boss.health);
        assert_eq!(boss.vel.y, settings.boss.speed);
        assert_eq!(boss.vel.x.abs(), settings.boss.sweep_speed);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let settings = Settings::default();
        let state = playing_state();
        let mut a = Spawner::new(&settings);
        let mut b = Spawner::new(&settings);
        let due = a.schedule().next_spawn_tick;
        assert_eq!(a.step(due, &state), b.step(due, &state));

        a.reset(0);
        let replay = a.step(due, &state);
        b.reset(0);
        assert_eq!(replay, b.step(due, &state));
    }

    #[test]
    fn test_wave_count_clamped_to_lanes() {
        let settings = Settings {
            spawn: SpawnSettings {
                enemies_per_wave: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut spawner = Spawner::new(&settings);
        let due = spawner.schedule().next_spawn_tick;
        let wave = spawner.step(due, &playing_state());
        assert_eq!(wave.len() as u32, spawner.lane_count());
        let r = settings.enemy_radius;
        let w = settings.playfield_width;
        assert!(wave.iter().all(|req| req.pos.x >= r && req.pos.x <= w - r));
    }

    #[test]
    fn test_enemies_hold_fire_until_delay() {
        let settings = Settings {
            enemy_fire: EnemyFireSettings {
                chance: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut spawner = Spawner::new(&settings);
        let mut store = EntityStore::default();
        let pos = Vec2::new(100.0, 100.0);
        store
            .create(GamePhase::Playing, EntityKind::Enemy, pos, Vec2::ZERO)
            .unwrap();

        let delay = settings.enemy_fire.delay_ticks;
        assert!(spawner.enemy_fire(delay - 1, &store).is_empty());
        let shots = spawner.enemy_fire(delay, &store);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].role, Role::Hostile);
        assert_eq!(shots[0].vel, Vec2::new(0.0, settings.enemy_fire.bullet_speed));
        assert!(shots[0].pos.y > pos.y);
    }

    #[test]
    fn test_boss_aims_at_player_within_shot_cap() {
        let settings = Settings {
            boss: BossSettings {
                fire_chance: 1.0,
                aim_jitter: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut spawner = Spawner::new(&settings);
        let mut store = EntityStore::default();
        let player = Vec2::new(400.0, 600.0);
        store
            .create(GamePhase::Playing, EntityKind::Player, player, Vec2::ZERO)
            .unwrap();
        let boss = Vec2::new(100.0, 100.0);
        store
            .create_as(GamePhase::Playing, EntityKind::Enemy, Role::Boss, boss, Vec2::ZERO)
            .unwrap();

        let shots = spawner.enemy_fire(0, &store);
        assert_eq!(shots.len(), 1);
        let heading = shots[0].vel.normalize();
        let expected = (player - shots[0].pos).normalize();
        assert!(heading.abs_diff_eq(expected, 1e-4));
        assert!((shots[0].vel.length() - settings.boss.shot_speed).abs() < 1e-3);

        for _ in 0..settings.boss.max_shots {
            store
                .create_as(GamePhase::Playing, EntityKind::Bullet, Role::Hostile, boss, Vec2::ZERO)
                .unwrap();
        }
        assert!(spawner.enemy_fire(0, &store).is_empty());
    }
}
