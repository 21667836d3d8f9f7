use shooting_game::Settings;
use shooting_game::settings::{BossSettings, EnemyFireSettings, SpawnSettings};
use shooting_game::sim::{Command, EntityKind, GamePhase, TickInput, World, tick};

/// Quiet sessions: no gunfire, no bosses and enough lives to outlast breaches
fn settings_with(spawn: SpawnSettings) -> Settings {
    Settings {
        starting_lives: 1000,
        spawn,
        enemy_fire: EnemyFireSettings {
            chance: 0.0,
            ..Default::default()
        },
        boss: BossSettings {
            every_waves: 0,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Session ticks at which waves were released, driving only `tick()`
fn release_ticks(settings: Settings, session_ticks: u64) -> Vec<u64> {
    let mut world = World::new(settings);
    tick(&mut world, &TickInput::default().with(Command::Start));

    let mut releases = Vec::new();
    let mut released = world.spawner.released_waves();
    while world.state.elapsed_ticks < session_ticks {
        let enemies = world.store.count(EntityKind::Enemy);
        tick(&mut world, &TickInput::default());
        assert_eq!(world.state.phase, GamePhase::Playing);
        if world.spawner.released_waves() > released {
            released = world.spawner.released_waves();
            releases.push(world.state.elapsed_ticks);
            assert!(world.store.count(EntityKind::Enemy) > enemies);
        }
    }
    releases
}

#[test]
fn shorter_interval_spawns_the_next_wave_sooner() {
    let slow = settings_with(SpawnSettings {
        interval_ticks: 600,
        ..Default::default()
    });
    let fast = settings_with(SpawnSettings {
        interval_ticks: 60,
        ..Default::default()
    });
    let first = u64::from(slow.spawn.first_spawn_delay_ticks);

    let slow_releases = release_ticks(slow, 700);
    let fast_releases = release_ticks(fast, 700);

    assert_eq!(slow_releases, vec![first, first + 600]);
    assert_eq!(fast_releases[..2], [first, first + 60]);
    assert!(fast_releases.len() > slow_releases.len());
}

#[test]
fn interval_shrinks_after_each_release_down_to_the_floor() {
    let spawn = SpawnSettings {
        interval_ticks: 240,
        min_interval_ticks: 100,
        interval_decay: 0.5,
        ..Default::default()
    };
    let releases = release_ticks(settings_with(spawn), 900);

    let gaps: Vec<u64> = releases.windows(2).map(|w| w[1] - w[0]).collect();
    assert_eq!(gaps[..4], [240, 120, 100, 100]);
}

#[test]
fn waves_keep_coming_while_earlier_waves_live() {
    let mut world = World::new(settings_with(SpawnSettings::default()));
    tick(&mut world, &TickInput::default().with(Command::Start));
    while world.spawner.released_waves() < 3 {
        tick(&mut world, &TickInput::default());
    }

    // Nothing was shot and nothing has reached the line yet
    let per_wave = world.settings.spawn.enemies_per_wave;
    assert_eq!(world.state.lives, world.settings.starting_lives);
    assert_eq!(world.spawner.live_in_wave(1), per_wave);
    assert_eq!(world.spawner.live_in_wave(3), per_wave);
    assert_eq!(world.store.count(EntityKind::Enemy) as u32, 3 * per_wave);
    assert_eq!(world.state.wave, 1);
}

#[test]
fn paused_ticks_do_not_count_toward_the_timer() {
    let mut world = World::new(settings_with(SpawnSettings::default()));
    tick(&mut world, &TickInput::default().with(Command::Start));
    let due = world.spawner.schedule().next_spawn_tick;

    tick(&mut world, &TickInput::default().with(Command::Pause));
    for _ in 0..(2 * due) {
        tick(&mut world, &TickInput::default());
    }
    assert_eq!(world.spawner.released_waves(), 0);

    tick(&mut world, &TickInput::default().with(Command::Pause));
    while world.spawner.released_waves() == 0 {
        tick(&mut world, &TickInput::default());
    }
    assert_eq!(world.state.elapsed_ticks, due);
}
