//! Rendering interface
//!
//! The simulation never calls a graphics API. Each frame the loop hands the
//! renderer an immutable [`RenderSnapshot`] of the last completed tick.

pub mod ascii;
pub mod snapshot;

pub use ascii::AsciiRenderer;
pub use snapshot::{RenderSnapshot, Sprite};

/// Consumer of render snapshots; performs no simulation
pub trait Renderer {
    fn draw(&mut self, snapshot: &RenderSnapshot);
}

/// Keeps every snapshot it is given (replays, tests, recording)
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<RenderSnapshot>,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, snapshot: &RenderSnapshot) {
        self.frames.push(snapshot.clone());
    }
}
