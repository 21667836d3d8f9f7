//! Shooting Game entry point
//!
//! Headless demo: the autopilot plays a session against the real simulation
//! while the frame loop is fed jittery display timings, and the final frame
//! is printed as text. `RUST_LOG` controls log output.

use shooting_game::Settings;
use shooting_game::consts::SIM_DT;
use shooting_game::platform::{Autopilot, FixedStepLoop, LoopControl};
use shooting_game::renderer::AsciiRenderer;
use shooting_game::sim::{GamePhase, World};

/// Simulated wall-clock length of the demo (seconds)
const DEMO_SECONDS: f64 = 120.0;

fn main() {
    env_logger::init();
    log::info!("Shooting Game (headless) starting...");

    let settings = Settings::load_or_default();
    log::info!("Game initialized with seed: {}", settings.seed);

    let mut world = World::new(settings);
    let mut game_loop = FixedStepLoop::default();
    let mut pilot = Autopilot::default();
    let mut renderer = AsciiRenderer::new(48, 32);

    // Alternate between 75 Hz and 50 Hz frames so ticks and frames drift
    let frame_times = [1.0 / 75.0, 1.0 / 50.0];
    let mut elapsed = 0.0;
    let mut frame = 0usize;
    while elapsed < DEMO_SECONDS {
        let dt = frame_times[frame % frame_times.len()];
        frame += 1;
        elapsed += dt;

        let last_phase = world.state.phase;
        if game_loop.frame(&mut world, dt, &mut pilot, &mut renderer) == LoopControl::Quit {
            break;
        }
        if world.state.phase == GamePhase::GameOver && last_phase != GamePhase::GameOver {
            log::info!(
                "Run over: score {} at wave {} after {} ticks",
                world.state.score,
                world.state.wave,
                world.state.elapsed_ticks
            );
        }
    }

    println!("{}", renderer.frame());
    println!(
        "{} frames, {} ticks ({:.1} s simulated at {:.0} Hz)",
        game_loop.frames(),
        world.ticks(),
        world.ticks() as f64 * f64::from(SIM_DT),
        1.0 / SIM_DT
    );
    match world.high_scores.top_score() {
        Some(best) => println!("Best score this session: {best}"),
        None => println!("No finished runs yet (current score {})", world.state.score),
    }
}
