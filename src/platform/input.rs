//! Built-in input adapters

use super::InputAdapter;
use crate::renderer::RenderSnapshot;
use crate::sim::{Command, EntityKind, GamePhase, TickInput};

/// Replays a fixed list of per-tick inputs, then idles
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Vec<TickInput>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(script: Vec<TickInput>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Whether every scripted tick has been consumed
    pub fn finished(&self) -> bool {
        self.cursor >= self.script.len()
    }
}

impl InputAdapter for ScriptedInput {
    fn poll(&mut self, _last: &RenderSnapshot) -> TickInput {
        let input = self.script.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        input
    }
}

/// Demo mode - plays the game from the last snapshot.
///
/// Starts sessions on its own, steers under the enemy closest to the defense
/// line and fires once lined up. Restarts as soon as the game-over lockout
/// allows it.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Horizontal distance within which the player counts as lined up
    pub aim_tolerance: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { aim_tolerance: 6.0 }
    }
}

impl InputAdapter for Autopilot {
    fn poll(&mut self, last: &RenderSnapshot) -> TickInput {
        match last.phase {
            GamePhase::Intro => return TickInput::default().with(Command::Start),
            GamePhase::GameOver if last.restart_locked() => return TickInput::default(),
            GamePhase::GameOver => return TickInput::default().with(Command::Restart),
            GamePhase::Paused => return TickInput::default().with(Command::Pause),
            GamePhase::Playing => {}
        }

        let Some(player) = last.player() else {
            return TickInput::default();
        };

        // Most dangerous enemy: lowest on screen, ties broken by id
        let target = last
            .sprites_of(EntityKind::Enemy)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y).then(b.id.cmp(&a.id)));
        let Some(target) = target else {
            return TickInput::default();
        };

        let dx = target.pos.x - player.pos.x;
        let mut input = TickInput::default();
        if dx < -self.aim_tolerance {
            input = input.with(Command::MoveLeft);
        } else if dx > self.aim_tolerance {
            input = input.with(Command::MoveRight);
        } else {
            input = input.with(Command::Fire);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{World, tick};

    #[test]
    fn test_script_then_idle() {
        let world = World::new(Settings::default());
        let fire = TickInput::default().with(Command::Fire);
        let mut script = ScriptedInput::new(vec![fire]);

        assert_eq!(script.poll(world.snapshot()), fire);
        assert!(script.finished());
        assert_eq!(script.poll(world.snapshot()), TickInput::default());
    }

    #[test]
    fn test_autopilot_starts_and_aims() {
        let mut world = World::new(Settings::default());
        let mut pilot = Autopilot::default();

        let input = pilot.poll(world.snapshot());
        assert!(input.start);
        tick(&mut world, &input);

        // Enemy far to the left of the centered player
        world
            .spawn_enemy(glam::Vec2::new(40.0, 100.0), glam::Vec2::ZERO)
            .unwrap();
        tick(&mut world, &TickInput::default());
        assert!(pilot.poll(world.snapshot()).move_left);

        // Enemy straight above: fire
        let mut world = World::new(Settings::default());
        tick(&mut world, &TickInput::default().with(Command::Start));
        let x = world.snapshot().player().unwrap().pos.x;
        world.spawn_enemy(glam::Vec2::new(x, 100.0), glam::Vec2::ZERO).unwrap();
        tick(&mut world, &TickInput::default());
        assert!(pilot.poll(world.snapshot()).fire);
    }

    #[test]
    fn test_autopilot_waits_out_restart_lockout() {
        let mut world = World::new(Settings::default());
        let mut pilot = Autopilot::default();
        let input = pilot.poll(world.snapshot());
        tick(&mut world, &input);
        let line = world.settings.defense_line_y;
        while world.state.phase == GamePhase::Playing {
            world
                .spawn_enemy(glam::Vec2::new(100.0, line), glam::Vec2::ZERO)
                .unwrap();
            tick(&mut world, &TickInput::default());
        }

        let mut waited = 0;
        while world.state.phase == GamePhase::GameOver {
            let input = pilot.poll(world.snapshot());
            assert_eq!(input.restart, !world.snapshot().restart_locked());
            tick(&mut world, &input);
            waited += 1;
        }
        assert_eq!(world.state.phase, GamePhase::Intro);
        assert_eq!(waited, world.settings.restart_lockout_ticks + 1);
    }
}
