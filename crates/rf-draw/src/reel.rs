//! Reel frame — the per-spin sequence of entries shown on the reel

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pool::PoolSnapshot;

/// Entries shown during one spin; the last entry is always the winner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelFrame {
    entries: Vec<String>,
}

impl ReelFrame {
    /// Build a frame of `length` entries ending on `winner`.
    ///
    /// Filler entries are uniform picks over both pools of the snapshot and
    /// are purely visual. A `length` of 0 is treated as 1.
    pub fn build<R: Rng + ?Sized>(
        snapshot: &PoolSnapshot,
        winner: &str,
        length: usize,
        rng: &mut R,
    ) -> Self {
        let length = length.max(1);
        let mut entries = Vec::with_capacity(length);

        for _ in 0..length - 1 {
            let entry = snapshot.random_entry(rng).unwrap_or(winner);
            entries.push(entry.to_string());
        }
        entries.push(winner.to_string());

        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry the reel settles on
    pub fn winner(&self) -> &str {
        self.entries.last().map(String::as_str).unwrap_or_default()
    }
}
