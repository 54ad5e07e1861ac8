//! Pool Manager — candidate pools, winner resolution and removal-on-win

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::{DrawError, DrawResult};

/// Which pool a winner was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawSource {
    /// The priority subset (drawn exclusively while non-empty)
    Priority,
    /// The general name pool
    Names,
}

/// A resolved winner and its originating pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub winner: String,
    pub source: DrawSource,
}

/// Selection policy: priority pool first, uniform within the active pool.
fn resolve_from<R: Rng + ?Sized>(
    names: &[String],
    priority_names: &[String],
    rng: &mut R,
) -> DrawResult<Draw> {
    let (pool, source) = if priority_names.is_empty() {
        (names, DrawSource::Names)
    } else {
        (priority_names, DrawSource::Priority)
    };

    pool.choose(rng)
        .map(|winner| Draw {
            winner: winner.clone(),
            source,
        })
        .ok_or(DrawError::EmptyPool)
}

/// Frozen copy of both pools, taken when a spin starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    names: Vec<String>,
    priority_names: Vec<String>,
}

impl PoolSnapshot {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn priority_names(&self) -> &[String] {
        &self.priority_names
    }

    /// Number of tickets across both pools
    pub fn len(&self) -> usize {
        self.names.len() + self.priority_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a winner from the frozen pools
    pub fn resolve_winner<R: Rng + ?Sized>(&self, rng: &mut R) -> DrawResult<Draw> {
        resolve_from(&self.names, &self.priority_names, rng)
    }

    /// Uniform pick over the combined pools, used for filler reel entries.
    ///
    /// Carries no selection weight; returns `None` only when both pools are empty.
    pub fn random_entry<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.len());
        self.names
            .get(index)
            .or_else(|| self.priority_names.get(index - self.names.len()))
            .map(String::as_str)
    }
}

/// Owner of the name pool, the priority pool and the removal policy.
///
/// Storage is never handed out mutably; every write goes through the setters
/// so the engine can gate them on spin state.
#[derive(Debug, Clone, Default)]
pub struct PoolManager {
    names: Vec<String>,
    priority_names: Vec<String>,
    remove_winner: bool,
}

impl PoolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the name pool wholesale (entries are assumed sanitized)
    pub fn set_names(&mut self, names: Vec<String>) {
        self.names = names;
    }

    /// Replace the priority pool wholesale (entries are assumed sanitized)
    pub fn set_priority_names(&mut self, names: Vec<String>) {
        self.priority_names = names;
    }

    pub fn set_remove_winner_from_pool(&mut self, remove: bool) {
        self.remove_winner = remove;
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn priority_names(&self) -> &[String] {
        &self.priority_names
    }

    pub fn remove_winner_from_pool(&self) -> bool {
        self.remove_winner
    }

    /// True when neither pool has a candidate
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.priority_names.is_empty()
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            names: self.names.clone(),
            priority_names: self.priority_names.clone(),
        }
    }

    /// Resolve a winner from the live pools
    pub fn resolve_winner<R: Rng + ?Sized>(&self, rng: &mut R) -> DrawResult<Draw> {
        resolve_from(&self.names, &self.priority_names, rng)
    }

    /// Remove the first occurrence of the winner from the pool it was drawn from.
    ///
    /// No-op when the removal policy is off. Returns whether an entry was removed.
    pub fn apply_removal(&mut self, draw: &Draw) -> bool {
        if !self.remove_winner {
            return false;
        }

        let pool = match draw.source {
            DrawSource::Priority => &mut self.priority_names,
            DrawSource::Names => &mut self.names,
        };

        match pool.iter().position(|name| *name == draw.winner) {
            Some(index) => {
                pool.remove(index);
                true
            }
            None => {
                log::warn!(
                    "Winner {:?} not found in {:?} pool, nothing removed",
                    draw.winner,
                    draw.source
                );
                false
            }
        }
    }
}
