//! Timed visual effects
//!
//! Explosions are not entities: nothing collides with them and they outlive
//! the run (they keep animating on the game-over screen).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::EXPLOSION_FRAME_TICKS;

/// A short two-frame explosion left where an enemy was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    /// Boss explosions are drawn larger
    pub large: bool,
    pub age_ticks: u32,
}

impl Explosion {
    /// Animation frame (0 or 1), alternating every few ticks
    pub fn frame(&self) -> u32 {
        (self.age_ticks / EXPLOSION_FRAME_TICKS) % 2
    }
}

/// Live explosions, oldest first
#[derive(Debug, Clone, Default)]
pub struct Effects {
    explosions: Vec<Explosion>,
    lifetime_ticks: u32,
}

impl Effects {
    pub fn new(lifetime_ticks: u32) -> Self {
        Self {
            explosions: Vec::new(),
            lifetime_ticks,
        }
    }

    pub fn explode(&mut self, pos: Vec2, radius: f32, large: bool) {
        if self.lifetime_ticks == 0 {
            return;
        }
        self.explosions.push(Explosion {
            pos,
            radius,
            large,
            age_ticks: 0,
        });
    }

    /// Age every explosion by one tick and drop the finished ones
    pub fn step(&mut self) {
        let lifetime = self.lifetime_ticks;
        for explosion in &mut self.explosions {
            explosion.age_ticks += 1;
        }
        self.explosions.retain(|e| e.age_ticks < lifetime);
    }

    pub fn clear(&mut self) {
        self.explosions.clear();
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }
}
