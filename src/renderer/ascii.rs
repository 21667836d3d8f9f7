//! Character-grid renderer for terminals and logs

use super::{RenderSnapshot, Renderer};
use super::Sprite;
use crate::sim::{EntityKind, GamePhase, Role};

/// Rasterizes snapshots onto a fixed character grid
#[derive(Debug, Clone)]
pub struct AsciiRenderer {
    columns: usize,
    rows: usize,
    frame: String,
    frames_drawn: u64,
}

impl AsciiRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            frame: String::new(),
            frames_drawn: 0,
        }
    }

    /// The most recently drawn frame
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    fn glyph(sprite: &Sprite) -> char {
        match (sprite.kind, sprite.role) {
            (EntityKind::Player, _) => 'A',
            (EntityKind::Bullet, Role::Hostile) => '!',
            (EntityKind::Bullet, _) => '|',
            (EntityKind::Enemy, Role::Boss) => 'M',
            (EntityKind::Enemy, _) => 'W',
        }
    }

    /// Grid cell for a playfield position, or None when off-grid
    fn cell(&self, snapshot: &RenderSnapshot, x: f32, y: f32) -> Option<(usize, usize)> {
        let fx = x / snapshot.playfield.x * self.columns as f32;
        let fy = y / snapshot.playfield.y * self.rows as f32;
        if fx < 0.0 || fy < 0.0 {
            return None;
        }
        // The far edges are inside the playfield, so fold them into the last cell
        let col = (fx as usize).min(self.columns - 1);
        let row = (fy as usize).min(self.rows - 1);
        Some((col, row))
    }
}

impl Renderer for AsciiRenderer {
    fn draw(&mut self, snapshot: &RenderSnapshot) {
        let mut grid = vec![vec![' '; self.columns]; self.rows];

        if let Some((_, row)) = self.cell(snapshot, 0.0, snapshot.defense_line_y) {
            grid[row].fill('-');
        }
        for sprite in &snapshot.sprites {
            if let Some((col, row)) = self.cell(snapshot, sprite.pos.x, sprite.pos.y) {
                grid[row][col] = Self::glyph(sprite);
            }
        }
        // Explosions draw over whatever is underneath
        for explosion in &snapshot.explosions {
            if let Some((col, row)) = self.cell(snapshot, explosion.pos.x, explosion.pos.y) {
                grid[row][col] = if explosion.frame() == 0 { '*' } else { '+' };
            }
        }

        let status = match snapshot.phase {
            GamePhase::Intro => "PRESS START",
            GamePhase::Playing => "",
            GamePhase::Paused => "PAUSED",
            GamePhase::GameOver if snapshot.restart_locked() => "GAME OVER",
            GamePhase::GameOver => "GAME OVER  PRESS RESTART",
        };

        self.frame.clear();
        self.frame.push_str(&format!(
            "score {:>6}  lives {}  wave {:>2}  {status}\n",
            snapshot.score, snapshot.lives, snapshot.wave
        ));
        for row in grid {
            self.frame.push('|');
            self.frame.extend(row);
            self.frame.push_str("|\n");
        }
        self.frames_drawn += 1;
    }
}
