//! Name-draw engine — spin state machine over the pool manager
//!
//! ```text
//!            spin()                      step() on final entry
//!   Idle ───────────────▶ Spinning ─────────────────────────────▶ Idle
//!     ▲   on_spin_start      │  step() → Advance { index, delay }    │
//!     │                      └──────────◀───────────┘                │
//!     └─────────── removal, spin_count += 1, on_spin_end ◀───────────┘
//! ```
//!
//! The animation is a sequence of discrete steps. A test harness calls
//! [`NameDrawEngine::step`] directly; [`crate::SpinDriver`] sleeps the
//! reported delays between steps on tokio.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::cadence::CadenceConfig;
use crate::config::{DEFAULT_MAX_REEL_LENGTH, DrawConfig, validate_reel_length};
use crate::error::{DrawError, DrawResult};
use crate::hooks::SpinHooks;
use crate::pool::{Draw, DrawSource, PoolManager};
use crate::reel::ReelFrame;
use crate::stage::{DrawStageEvent, build_timeline};

/// Result of a completed spin, handed to `on_spin_end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// 1-based spin number (equals `spin_count` right after completion)
    pub spin_id: u64,
    pub winner: String,
    pub source: DrawSource,
    /// Entries shown on the reel; the last one is `winner`
    pub frame: ReelFrame,
    /// Gaps between consecutive frame entries
    pub gap_delays: Vec<Duration>,
    /// Whether the winner was taken out of its pool
    pub removed: bool,
}

impl SpinOutcome {
    /// Time from the first to the last reel entry
    pub fn duration(&self) -> Duration {
        self.gap_delays.iter().sum()
    }

    pub fn timeline(&self) -> Vec<DrawStageEvent> {
        build_timeline(&self.frame, &self.gap_delays)
    }
}

/// A spin in flight: resolved winner, its frame and the playback cursor
#[derive(Debug, Clone)]
pub struct ActiveSpin {
    draw: Draw,
    frame: ReelFrame,
    gap_delays: Vec<Duration>,
    cursor: usize,
}

impl ActiveSpin {
    pub fn winner(&self) -> &str {
        &self.draw.winner
    }

    pub fn source(&self) -> DrawSource {
        self.draw.source
    }

    pub fn frame(&self) -> &ReelFrame {
        &self.frame
    }

    /// Index of the next entry to show
    pub fn position(&self) -> usize {
        self.cursor
    }
}

/// Spin state
#[derive(Debug, Clone, Default)]
pub enum SpinState {
    #[default]
    Idle,
    Spinning(ActiveSpin),
}

impl SpinState {
    pub fn is_spinning(&self) -> bool {
        matches!(self, SpinState::Spinning(_))
    }
}

/// One reel advance
#[derive(Debug, Clone, PartialEq)]
pub enum SpinStep {
    /// Entry `index` is now showing; wait `delay` before the next step
    Advance {
        index: usize,
        entry: String,
        delay: Duration,
    },
    /// The final entry is showing and the spin has completed
    Finished(SpinOutcome),
}

/// Session statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawStats {
    pub total_spins: u64,
    pub priority_draws: u64,
    pub general_draws: u64,
    pub winners_removed: u64,
}

/// Name-draw engine
///
/// Owns the pools exclusively; every mutation goes through the setters,
/// which are rejected with [`DrawError::SpinInProgress`] while a spin is in
/// flight. The winner of a spin is fixed when the spin starts.
pub struct NameDrawEngine<H: SpinHooks = ()> {
    pools: PoolManager,
    max_reel_length: usize,
    cadence: CadenceConfig,
    rng: StdRng,
    state: SpinState,
    spin_count: u64,
    stats: DrawStats,
    hooks: H,
}

impl NameDrawEngine<()> {
    /// Create an engine with empty pools and no hooks
    pub fn new() -> Self {
        Self::with_hooks(())
    }
}

impl Default for NameDrawEngine<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: SpinHooks> NameDrawEngine<H> {
    /// Create an engine with empty pools
    pub fn with_hooks(hooks: H) -> Self {
        Self {
            pools: PoolManager::new(),
            max_reel_length: DEFAULT_MAX_REEL_LENGTH,
            cadence: CadenceConfig::default(),
            rng: StdRng::from_os_rng(),
            state: SpinState::Idle,
            spin_count: 0,
            stats: DrawStats::default(),
            hooks,
        }
    }

    /// Create from a validated config. No pool-changed signal is fired.
    pub fn with_config(config: DrawConfig, hooks: H) -> DrawResult<Self> {
        config.validate()?;

        let mut engine = Self::with_hooks(hooks);
        engine.pools.set_names(config.names);
        engine.pools.set_priority_names(config.priority_names);
        engine
            .pools
            .set_remove_winner_from_pool(config.remove_winner_from_pool);
        engine.max_reel_length = config.max_reel_length;
        engine.cadence = config.cadence;
        Ok(engine)
    }

    /// Seed RNG for reproducible draws
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════

    fn ensure_idle(&self, what: &str) -> DrawResult<()> {
        if self.state.is_spinning() {
            log::warn!("Rejected {} while spinning", what);
            return Err(DrawError::SpinInProgress);
        }
        Ok(())
    }

    /// Replace the name pool (entries must already be trimmed and non-empty)
    pub fn set_names<S: Into<String>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> DrawResult<()> {
        self.ensure_idle("set_names")?;
        self.pools
            .set_names(names.into_iter().map(Into::into).collect());
        log::debug!("Name pool replaced ({} entries)", self.pools.names().len());
        self.hooks.on_pool_changed();
        Ok(())
    }

    /// Replace the priority pool (entries must already be trimmed and non-empty)
    pub fn set_priority_names<S: Into<String>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> DrawResult<()> {
        self.ensure_idle("set_priority_names")?;
        self.pools
            .set_priority_names(names.into_iter().map(Into::into).collect());
        log::debug!(
            "Priority pool replaced ({} entries)",
            self.pools.priority_names().len()
        );
        self.hooks.on_pool_changed();
        Ok(())
    }

    pub fn set_remove_winner_from_pool(&mut self, remove: bool) -> DrawResult<()> {
        self.ensure_idle("set_remove_winner_from_pool")?;
        self.pools.set_remove_winner_from_pool(remove);
        Ok(())
    }

    pub fn set_max_reel_length(&mut self, length: usize) -> DrawResult<()> {
        self.ensure_idle("set_max_reel_length")?;
        validate_reel_length(length)?;
        self.max_reel_length = length;
        Ok(())
    }

    pub fn set_cadence(&mut self, cadence: CadenceConfig) -> DrawResult<()> {
        self.ensure_idle("set_cadence")?;
        cadence.validate().map_err(DrawError::InvalidConfig)?;
        self.cadence = cadence;
        Ok(())
    }

    /// Apply a full config. Fires the pool-changed signal once.
    pub fn apply_config(&mut self, config: DrawConfig) -> DrawResult<()> {
        self.ensure_idle("apply_config")?;
        config.validate()?;

        self.pools.set_names(config.names);
        self.pools.set_priority_names(config.priority_names);
        self.pools
            .set_remove_winner_from_pool(config.remove_winner_from_pool);
        self.max_reel_length = config.max_reel_length;
        self.cadence = config.cadence;
        self.hooks.on_pool_changed();
        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> DrawConfig {
        DrawConfig {
            names: self.pools.names().to_vec(),
            priority_names: self.pools.priority_names().to_vec(),
            remove_winner_from_pool: self.pools.remove_winner_from_pool(),
            max_reel_length: self.max_reel_length,
            cadence: self.cadence.clone(),
        }
    }

    /// Export config as JSON
    pub fn export_config(&self) -> DrawResult<String> {
        self.config().to_json()
    }

    /// Import config from JSON
    pub fn import_config(&mut self, json: &str) -> DrawResult<()> {
        self.ensure_idle("import_config")?;
        let config = DrawConfig::from_json(json)?;
        self.apply_config(config)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn names(&self) -> &[String] {
        self.pools.names()
    }

    pub fn priority_names(&self) -> &[String] {
        self.pools.priority_names()
    }

    pub fn remove_winner_from_pool(&self) -> bool {
        self.pools.remove_winner_from_pool()
    }

    pub fn max_reel_length(&self) -> usize {
        self.max_reel_length
    }

    pub fn cadence(&self) -> &CadenceConfig {
        &self.cadence
    }

    /// Completed spins; never decreases
    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning()
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn active_spin(&self) -> Option<&ActiveSpin> {
        match &self.state {
            SpinState::Spinning(active) => Some(active),
            SpinState::Idle => None,
        }
    }

    pub fn stats(&self) -> &DrawStats {
        &self.stats
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════

    /// Start a spin.
    ///
    /// No-op while a spin is in flight. Fires `on_spin_start`, then resolves
    /// the winner from a snapshot of the pools and lays out the reel frame.
    /// Fails with [`DrawError::EmptyPool`] when both pools are empty; the
    /// engine is then idle again and `on_spin_end` is not fired.
    pub fn spin(&mut self) -> DrawResult<()> {
        if self.state.is_spinning() {
            log::debug!("Spin ignored: already spinning");
            return Ok(());
        }

        let snapshot = self.pools.snapshot();
        self.hooks.on_spin_start();

        let draw = match snapshot.resolve_winner(&mut self.rng) {
            Ok(draw) => draw,
            Err(e) => {
                log::warn!("Spin aborted: {}", e);
                return Err(e);
            }
        };

        let frame =
            ReelFrame::build(&snapshot, &draw.winner, self.max_reel_length, &mut self.rng);
        let gap_delays = self.cadence.gap_delays(frame.len());

        log::info!(
            "Spin {} started: {} entries over {:?}",
            self.spin_count + 1,
            frame.len(),
            gap_delays.iter().sum::<Duration>()
        );

        self.state = SpinState::Spinning(ActiveSpin {
            draw,
            frame,
            gap_delays,
            cursor: 0,
        });
        Ok(())
    }

    /// Advance the reel by one entry. `None` while idle.
    pub fn step(&mut self) -> Option<SpinStep> {
        let SpinState::Spinning(active) = &mut self.state else {
            return None;
        };

        let index = active.cursor;
        if index + 1 < active.frame.len() {
            active.cursor += 1;
            let entry = active.frame.get(index).unwrap_or_default().to_string();
            let delay = active.gap_delays.get(index).copied().unwrap_or_default();
            log::debug!("Reel entry {}: {} (next in {:?})", index, entry, delay);
            return Some(SpinStep::Advance { index, entry, delay });
        }

        match std::mem::take(&mut self.state) {
            SpinState::Spinning(active) => Some(SpinStep::Finished(self.complete(active))),
            SpinState::Idle => None,
        }
    }

    /// Run the remaining steps without waiting
    pub fn finish(&mut self) -> Option<SpinOutcome> {
        while let Some(step) = self.step() {
            if let SpinStep::Finished(outcome) = step {
                return Some(outcome);
            }
        }
        None
    }

    /// Settle a spin whose final entry is showing. State is already idle.
    fn complete(&mut self, active: ActiveSpin) -> SpinOutcome {
        let ActiveSpin {
            draw,
            frame,
            gap_delays,
            ..
        } = active;

        let removed = self.pools.apply_removal(&draw);
        self.spin_count += 1;

        self.stats.total_spins += 1;
        match draw.source {
            DrawSource::Priority => self.stats.priority_draws += 1,
            DrawSource::Names => self.stats.general_draws += 1,
        }
        if removed {
            self.stats.winners_removed += 1;
        }

        log::info!(
            "Spin {} finished: winner {:?} from {:?} pool{}",
            self.spin_count,
            draw.winner,
            draw.source,
            if removed { " (removed)" } else { "" }
        );

        let outcome = SpinOutcome {
            spin_id: self.spin_count,
            winner: draw.winner,
            source: draw.source,
            frame,
            gap_delays,
            removed,
        };
        self.hooks.on_spin_end(&outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_REEL_LENGTH;

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl SpinHooks for Recorder {
        fn on_spin_start(&mut self) {
            self.events.push("start".into());
        }

        fn on_spin_end(&mut self, outcome: &SpinOutcome) {
            self.events.push(format!("end:{}", outcome.winner));
        }

        fn on_pool_changed(&mut self) {
            self.events.push("pool".into());
        }
    }

    fn engine(names: &[&str]) -> NameDrawEngine<Recorder> {
        let mut engine = NameDrawEngine::with_hooks(Recorder::default());
        engine.seed(12345);
        engine.set_names(names.iter().copied()).unwrap();
        engine.hooks_mut().events.clear();
        engine
    }

    #[test]
    fn test_engine_creation() {
        let engine = NameDrawEngine::new();
        assert!(!engine.is_spinning());
        assert_eq!(engine.spin_count(), 0);
        assert_eq!(engine.max_reel_length(), DEFAULT_MAX_REEL_LENGTH);
        assert!(engine.names().is_empty());
    }

    #[test]
    fn test_spin_start_fires_synchronously() {
        let mut engine = engine(&["Alice", "Bob", "Carol"]);

        engine.spin().unwrap();
        assert!(engine.is_spinning());
        assert_eq!(engine.hooks().events, vec!["start"]);
        assert_eq!(engine.active_spin().map(|a| a.position()), Some(0));
    }

    #[test]
    fn test_step_sequence() {
        let mut engine = engine(&["Alice", "Bob", "Carol"]);
        engine.set_max_reel_length(10).unwrap();
        engine.spin().unwrap();

        let mut advances = 0;
        let outcome = loop {
            match engine.step() {
                Some(SpinStep::Advance { index, .. }) => {
                    assert_eq!(index, advances);
                    advances += 1;
                }
                Some(SpinStep::Finished(outcome)) => break outcome,
                None => panic!("engine went idle without finishing"),
            }
        };

        assert_eq!(advances, 9);
        assert_eq!(outcome.frame.len(), 10);
        assert_eq!(outcome.frame.winner(), outcome.winner);
        assert_eq!(outcome.gap_delays.len(), 9);
        assert!(!engine.is_spinning());
        assert!(engine.step().is_none());
    }

    #[test]
    fn test_spin_while_spinning_is_noop() {
        let mut engine = engine(&["Alice", "Bob"]);
        engine.spin().unwrap();
        let winner = engine.active_spin().map(|a| a.winner().to_string());

        engine.spin().unwrap();
        engine.spin().unwrap();

        assert_eq!(engine.hooks().events, vec!["start"]);
        assert_eq!(engine.active_spin().map(|a| a.winner().to_string()), winner);

        engine.finish();
        assert_eq!(engine.spin_count(), 1);
    }

    #[test]
    fn test_empty_pool_aborts_spin() {
        let mut engine = engine(&[]);

        assert_eq!(engine.spin(), Err(DrawError::EmptyPool));
        assert!(!engine.is_spinning());
        assert_eq!(engine.spin_count(), 0);
        // Start fired, its paired end did not
        assert_eq!(engine.hooks().events, vec!["start"]);
    }

    #[test]
    fn test_end_fires_after_idle_and_removal() {
        let mut engine = engine(&["Alice"]);
        engine.set_remove_winner_from_pool(true).unwrap();
        engine.spin().unwrap();

        let outcome = engine.finish().unwrap();
        assert_eq!(outcome.winner, "Alice");
        assert!(outcome.removed);
        assert_eq!(outcome.spin_id, 1);
        assert!(engine.names().is_empty());
        assert_eq!(engine.hooks().events, vec!["start", "end:Alice"]);
    }

    #[test]
    fn test_removes_first_occurrence() {
        let mut engine = engine(&["A", "B", "A"]);
        engine.set_remove_winner_from_pool(true).unwrap();

        // Spin until "A" wins once
        loop {
            engine.set_names(["A", "B", "A"]).unwrap();
            engine.spin().unwrap();
            let outcome = engine.finish().unwrap();
            if outcome.winner == "A" {
                break;
            }
        }
        assert_eq!(engine.names(), ["B".to_string(), "A".to_string()].as_slice());
    }

    #[test]
    fn test_mutation_rejected_while_spinning() {
        let mut engine = engine(&["Alice", "Bob"]);
        engine.spin().unwrap();

        assert_eq!(engine.set_names(["Zed"]), Err(DrawError::SpinInProgress));
        assert_eq!(
            engine.set_priority_names(["Zed"]),
            Err(DrawError::SpinInProgress)
        );
        assert_eq!(
            engine.set_remove_winner_from_pool(true),
            Err(DrawError::SpinInProgress)
        );
        assert_eq!(engine.set_max_reel_length(5), Err(DrawError::SpinInProgress));
        assert_eq!(engine.names().len(), 2);
        assert!(!engine.hooks().events.contains(&"pool".to_string()));

        let outcome = engine.finish().unwrap();
        assert!(outcome.winner == "Alice" || outcome.winner == "Bob");
    }

    #[test]
    fn test_pool_changed_fires_when_idle() {
        let mut engine = engine(&["Alice"]);

        engine.set_names(["Alice", "Bob"]).unwrap();
        engine.set_priority_names(["Carol"]).unwrap();
        engine.set_remove_winner_from_pool(true).unwrap();

        assert_eq!(engine.hooks().events, vec!["pool", "pool"]);
    }

    #[test]
    fn test_spin_count_survives_pool_changes() {
        let mut engine = engine(&["Alice", "Bob"]);
        for _ in 0..3 {
            engine.spin().unwrap();
            engine.finish();
        }
        engine.set_names(["Carol"]).unwrap();
        engine.set_priority_names(Vec::<String>::new()).unwrap();

        assert_eq!(engine.spin_count(), 3);
        assert_eq!(engine.stats().total_spins, 3);
        assert_eq!(engine.stats().general_draws, 3);
    }

    #[test]
    fn test_priority_stats_and_removal() {
        let mut engine = engine(&["Alice", "Bob"]);
        engine.set_priority_names(["Carol"]).unwrap();
        engine.set_remove_winner_from_pool(true).unwrap();

        engine.spin().unwrap();
        let outcome = engine.finish().unwrap();

        assert_eq!(outcome.winner, "Carol");
        assert_eq!(outcome.source, DrawSource::Priority);
        assert!(engine.priority_names().is_empty());
        assert_eq!(engine.names().len(), 2);
        assert_eq!(engine.stats().priority_draws, 1);
        assert_eq!(engine.stats().winners_removed, 1);
    }

    #[test]
    fn test_seed_reproducible() {
        let run = || {
            let mut engine = engine(&["A", "B", "C", "D", "E"]);
            engine.seed(777);
            engine.spin().unwrap();
            engine.finish().unwrap()
        };
        let first = run();
        let second = run();
        assert_eq!(first.winner, second.winner);
        assert_eq!(first.frame, second.frame);
    }

    #[test]
    fn test_config_round_trip_through_engine() {
        let mut engine = engine(&["Alice"]);
        engine.set_priority_names(["Bob"]).unwrap();
        engine.hooks_mut().events.clear();

        let json = engine.export_config().unwrap();
        let mut other = NameDrawEngine::with_hooks(Recorder::default());
        other.import_config(&json).unwrap();

        assert_eq!(other.names(), engine.names());
        assert_eq!(other.priority_names(), engine.priority_names());
        assert_eq!(other.hooks().events, vec!["pool"]);
        assert!(matches!(
            other.import_config("{ \"max_reel_length\": 0 }"),
            Err(DrawError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_with_config() {
        let config = DrawConfig {
            max_reel_length: 5,
            ..DrawConfig::with_names(["Alice", "Bob"])
        };
        let mut engine = NameDrawEngine::with_config(config, ()).unwrap();
        engine.spin().unwrap();
        assert_eq!(engine.finish().map(|o| o.frame.len()), Some(5));

        let invalid = DrawConfig {
            max_reel_length: 0,
            ..DrawConfig::default()
        };
        assert!(NameDrawEngine::with_config(invalid, ()).is_err());
    }

    #[test]
    fn test_reel_length_one() {
        let mut engine = engine(&["Alice", "Bob"]);
        engine.set_max_reel_length(1).unwrap();
        engine.spin().unwrap();

        match engine.step() {
            Some(SpinStep::Finished(outcome)) => {
                assert_eq!(outcome.frame.len(), 1);
                assert!(outcome.gap_delays.is_empty());
            }
            other => panic!("expected immediate finish, got {other:?}"),
        }
        assert_eq!(
            engine.set_max_reel_length(0),
            Err(DrawError::InvalidConfig("max_reel_length must be greater than 0".into()))
        );
    }

    #[test]
    fn test_reel_length_upper_bound() {
        let mut engine = engine(&["Alice", "Bob"]);
        assert!(matches!(
            engine.set_max_reel_length(usize::MAX),
            Err(DrawError::InvalidConfig(_))
        ));
        assert_eq!(engine.max_reel_length(), DEFAULT_MAX_REEL_LENGTH);

        engine.set_max_reel_length(MAX_REEL_LENGTH).unwrap();
        engine.set_cadence(CadenceConfig::studio()).unwrap();
        engine.spin().unwrap();
        assert_eq!(engine.finish().map(|o| o.frame.len()), Some(MAX_REEL_LENGTH));
    }

    #[test]
    fn test_huge_cadence_rejected_before_spin() {
        let mut engine = engine(&["Alice", "Bob"]);
        let json = r#"{
            "names": ["A", "B"],
            "cadence": {
                "profile": "Custom",
                "average_gap_ms": 1e300,
                "min_gap_ms": 0.0,
                "curve": "Linear"
            }
        }"#;
        assert!(matches!(
            engine.import_config(json),
            Err(DrawError::InvalidConfig(_))
        ));
        assert!(matches!(
            engine.set_cadence(CadenceConfig::normal().scaled(1e300)),
            Err(DrawError::InvalidConfig(_))
        ));

        // Rejected configs leave the engine spinnable
        assert_eq!(engine.names(), ["Alice", "Bob"].map(String::from).as_slice());
        engine.spin().unwrap();
        assert!(engine.finish().is_some());
    }
}
