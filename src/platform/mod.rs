//! Platform abstraction layer
//!
//! Handles the host-facing side of the simulation:
//! - Input adapters that turn device state into per-tick commands
//! - The fixed-step frame loop that converts real time into ticks

pub mod input;

pub use input::{Autopilot, ScriptedInput};

use crate::consts::SIM_DT;
use crate::renderer::{RenderSnapshot, Renderer};
use crate::sim::{TickInput, World, tick};

/// Source of per-tick commands.
///
/// Adapters see the previous tick's snapshot (read-only) and hand back an
/// owned command set; they never touch the world directly.
pub trait InputAdapter {
    fn poll(&mut self, last: &RenderSnapshot) -> TickInput;
}

impl<F> InputAdapter for F
where
    F: FnMut(&RenderSnapshot) -> TickInput,
{
    fn poll(&mut self, last: &RenderSnapshot) -> TickInput {
        self(last)
    }
}

/// Whether the host should keep calling [`FixedStepLoop::frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Fixed timestep with accumulator.
///
/// Every whole `dt` of accumulated real time becomes one tick; leftover time
/// carries into the next frame. Ticks are never dropped or split.
#[derive(Debug, Clone)]
pub struct FixedStepLoop {
    dt: f64,
    accumulator: f64,
    frames: u64,
    last_frame_ticks: u32,
}

impl Default for FixedStepLoop {
    fn default() -> Self {
        Self::new(f64::from(SIM_DT))
    }
}

impl FixedStepLoop {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            frames: 0,
            last_frame_ticks: 0,
        }
    }

    /// Real time not yet consumed by a tick
    pub fn pending_time(&self) -> f64 {
        self.accumulator
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Ticks executed by the most recent frame
    pub fn last_frame_ticks(&self) -> u32 {
        self.last_frame_ticks
    }

    /// Run one display frame: all due ticks, then one draw of the newest snapshot
    pub fn frame<I, R>(
        &mut self,
        world: &mut World,
        real_dt: f64,
        input: &mut I,
        renderer: &mut R,
    ) -> LoopControl
    where
        I: InputAdapter + ?Sized,
        R: Renderer + ?Sized,
    {
        // A non-finite frame time would never drain the accumulator
        let real_dt = if real_dt.is_finite() {
            real_dt.max(0.0)
        } else {
            log::warn!("Ignoring non-finite frame time {real_dt}");
            0.0
        };
        self.accumulator += real_dt;
        self.frames += 1;

        let mut control = LoopControl::Continue;
        let mut ticks = 0;
        while self.accumulator >= self.dt {
            let commands = input.poll(world.snapshot());
            tick(world, &commands);
            self.accumulator -= self.dt;
            ticks += 1;

            if commands.quit {
                log::info!("Quit requested at tick {}", world.ticks());
                control = LoopControl::Quit;
                break;
            }
        }
        self.last_frame_ticks = ticks;
        if ticks > 1 {
            log::trace!("Frame {} caught up {ticks} ticks", self.frames);
        }

        renderer.draw(world.snapshot());
        control
    }
}
