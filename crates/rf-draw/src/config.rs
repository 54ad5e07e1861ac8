//! Draw engine configuration

use serde::{Deserialize, Serialize};

use crate::cadence::CadenceConfig;
use crate::error::{DrawError, DrawResult};

/// Reel length used by the prize wheel display
pub const DEFAULT_MAX_REEL_LENGTH: usize = 40;

/// Longest reel a spin may build
pub const MAX_REEL_LENGTH: usize = 10_000;

/// Check a reel length is within `1..=MAX_REEL_LENGTH`
pub fn validate_reel_length(length: usize) -> DrawResult<()> {
    if length == 0 {
        return Err(DrawError::InvalidConfig(
            "max_reel_length must be greater than 0".into(),
        ));
    }
    if length > MAX_REEL_LENGTH {
        return Err(DrawError::InvalidConfig(format!(
            "max_reel_length must be at most {MAX_REEL_LENGTH}, got {length}"
        )));
    }
    Ok(())
}

/// Complete draw configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// General name pool (one ticket per entry)
    pub names: Vec<String>,
    /// Priority pool, drawn exclusively while non-empty
    pub priority_names: Vec<String>,
    /// Remove each winner from the pool it was drawn from
    pub remove_winner_from_pool: bool,
    /// Entries shown per spin, winner included
    pub max_reel_length: usize,
    /// Reel timing
    pub cadence: CadenceConfig,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            priority_names: Vec::new(),
            remove_winner_from_pool: false,
            max_reel_length: DEFAULT_MAX_REEL_LENGTH,
            cadence: CadenceConfig::default(),
        }
    }
}

impl DrawConfig {
    /// Config with a name pool and defaults for everything else
    pub fn with_names(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Headless config: instant cadence
    pub fn studio() -> Self {
        Self {
            cadence: CadenceConfig::studio(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DrawResult<()> {
        validate_reel_length(self.max_reel_length)?;
        self.cadence.validate().map_err(DrawError::InvalidConfig)
    }

    pub fn to_json(&self) -> DrawResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> DrawResult<Self> {
        let config: DrawConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
