//! Reel cadence — decelerating gap timing between reel entries

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest gap a cadence may ask for (ms)
pub const MAX_GAP_MS: f64 = 60_000.0;

/// Cadence profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CadenceProfile {
    /// Normal presentation timing
    #[default]
    Normal,
    /// Fast mode
    Turbo,
    /// Instant (headless runs and tests)
    Studio,
    /// Hand-tuned values
    Custom,
}

/// Cumulative time curve for a spin-down.
///
/// `cumulative(x)` maps the fraction of reel gaps passed to the fraction of
/// total duration elapsed. Convex curves make later gaps longer, so the reel
/// appears to slow down onto the final entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DecelerationCurve {
    /// Constant gaps (no deceleration)
    Linear,
    /// y = x²
    #[default]
    Quadratic,
    /// y = x³
    Cubic,
    /// y = (e^(3x) - 1) / (e^3 - 1)
    Exponential,
}

impl DecelerationCurve {
    /// Evaluate at position x (0.0 - 1.0)
    #[inline]
    pub fn cumulative(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);

        match self {
            DecelerationCurve::Linear => x,
            DecelerationCurve::Quadratic => x * x,
            DecelerationCurve::Cubic => x * x * x,
            DecelerationCurve::Exponential => {
                ((x * 3.0).exp() - 1.0) / (3.0_f64.exp() - 1.0)
            }
        }
    }
}

/// Detailed cadence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceConfig {
    /// Profile type
    pub profile: CadenceProfile,

    /// Average time between two reel entries (ms)
    pub average_gap_ms: f64,

    /// Shortest allowed gap (ms)
    pub min_gap_ms: f64,

    /// Deceleration curve
    pub curve: DecelerationCurve,
}

impl CadenceConfig {
    /// Normal timing: a 40-entry reel spins down in about 3.9 s
    pub fn normal() -> Self {
        Self {
            profile: CadenceProfile::Normal,
            average_gap_ms: 100.0,
            min_gap_ms: 16.0,
            curve: DecelerationCurve::Quadratic,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: CadenceProfile::Turbo,
            average_gap_ms: 40.0,
            min_gap_ms: 8.0,
            curve: DecelerationCurve::Quadratic,
        }
    }

    /// Studio mode (no waiting at all)
    pub fn studio() -> Self {
        Self {
            profile: CadenceProfile::Studio,
            average_gap_ms: 0.0,
            min_gap_ms: 0.0,
            curve: DecelerationCurve::Linear,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: CadenceProfile) -> Self {
        match profile {
            CadenceProfile::Normal => Self::normal(),
            CadenceProfile::Turbo => Self::turbo(),
            CadenceProfile::Studio => Self::studio(),
            CadenceProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: CadenceProfile::Custom,
            average_gap_ms: self.average_gap_ms * factor,
            min_gap_ms: self.min_gap_ms * factor,
            curve: self.curve,
        }
    }

    /// Whether every gap is zero
    pub fn is_instant(&self) -> bool {
        self.average_gap_ms <= 0.0
    }

    /// Check the numbers are usable
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("average_gap_ms", self.average_gap_ms),
            ("min_gap_ms", self.min_gap_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
            if value > MAX_GAP_MS {
                return Err(format!("{name} must be at most {MAX_GAP_MS} ms, got {value}"));
            }
        }
        Ok(())
    }

    /// Delays between consecutive entries of a reel with `reel_length` entries.
    ///
    /// Yields `reel_length - 1` gaps, monotonically non-decreasing.
    pub fn gap_delays(&self, reel_length: usize) -> Vec<Duration> {
        let gaps = reel_length.saturating_sub(1);
        if gaps == 0 {
            return Vec::new();
        }
        if self.is_instant() {
            return vec![Duration::ZERO; gaps];
        }

        let total_ms = self.average_gap_ms * gaps as f64;
        let n = gaps as f64;
        let mut previous = 0.0_f64;

        (0..gaps)
            .map(|k| {
                let start = self.curve.cumulative(k as f64 / n);
                let end = self.curve.cumulative((k + 1) as f64 / n);
                // Float noise must not break monotonicity
                let gap = (total_ms * (end - start)).max(self.min_gap_ms).max(previous);
                previous = gap;
                Duration::from_secs_f64(gap / 1000.0)
            })
            .collect()
    }

    /// Total time from the first to the last entry
    pub fn total_duration(&self, reel_length: usize) -> Duration {
        self.gap_delays(reel_length).into_iter().sum()
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self::normal()
    }
}
