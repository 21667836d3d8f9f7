//! Best runs of this process
//!
//! Runs rank by score, then by the wave they reached; an exact tie keeps the
//! older run ahead. Nothing is persisted.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

/// Runs kept on the board
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Wave the run was on when it ended
    pub wave: u32,
    /// World tick at which the run ended
    pub tick: u64,
}

impl HighScoreEntry {
    /// Sort key, smallest first
    fn rank_key(&self) -> (Reverse<u64>, Reverse<u32>) {
        (Reverse(self.score), Reverse(self.wave))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot a run would take, or None when it stays off the board.
    /// Scoreless runs never make it.
    fn slot(&self, entry: &HighScoreEntry) -> Option<usize> {
        if entry.score == 0 {
            return None;
        }
        let key = entry.rank_key();
        let slot = self.entries.partition_point(|e| e.rank_key() <= key);
        (slot < MAX_HIGH_SCORES).then_some(slot)
    }

    /// Whether a run with this score and wave would enter the board
    pub fn qualifies(&self, score: u64, wave: u32) -> bool {
        self.slot(&HighScoreEntry { score, wave, tick: 0 }).is_some()
    }

    /// Record a finished run; returns its 1-based rank when it made the board
    pub fn add_score(&mut self, score: u64, wave: u32, tick: u64) -> Option<usize> {
        let entry = HighScoreEntry { score, wave, tick };
        let slot = self.slot(&entry)?;
        self.entries.insert(slot, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
