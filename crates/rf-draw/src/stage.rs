//! Stage timeline for a finished spin
//!
//! External audio and visual collaborators sync their effects to these
//! events (spin loop for the whole reel duration, reveal on the last entry).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::reel::ReelFrame;

/// Canonical spin stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawStage {
    SpinStart,
    ReelAdvance { index: usize },
    WinnerRevealed,
    SpinEnd,
}

impl DrawStage {
    pub fn type_name(&self) -> &'static str {
        match self {
            DrawStage::SpinStart => "spin_start",
            DrawStage::ReelAdvance { .. } => "reel_advance",
            DrawStage::WinnerRevealed => "winner_revealed",
            DrawStage::SpinEnd => "spin_end",
        }
    }
}

/// A stage with its offset from spin start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawStageEvent {
    pub stage: DrawStage,

    /// Milliseconds since spin start
    pub timestamp_ms: f64,

    /// Reel entry shown at this stage, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

impl DrawStageEvent {
    pub fn new(stage: DrawStage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            entry: None,
        }
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }
}

/// Lay the frame's entries out on the gap delays that separate them
pub fn build_timeline(frame: &ReelFrame, gap_delays: &[Duration]) -> Vec<DrawStageEvent> {
    let mut events = Vec::with_capacity(frame.len() + 3);
    let mut elapsed = Duration::ZERO;

    events.push(DrawStageEvent::new(DrawStage::SpinStart, 0.0));

    for (index, entry) in frame.entries().iter().enumerate() {
        if index > 0 {
            elapsed += gap_delays.get(index - 1).copied().unwrap_or_default();
        }
        events.push(
            DrawStageEvent::new(DrawStage::ReelAdvance { index }, as_ms(elapsed))
                .with_entry(entry.as_str()),
        );
    }

    let end_ms = as_ms(elapsed);
    events.push(DrawStageEvent::new(DrawStage::WinnerRevealed, end_ms).with_entry(frame.winner()));
    events.push(DrawStageEvent::new(DrawStage::SpinEnd, end_ms));
    events
}

fn as_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
