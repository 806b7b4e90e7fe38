//! Race configuration
//!
//! Loaded from a JSON document with camelCase keys:
//!
//! ```json
//! {
//!     "laps": 2,
//!     "lapLen": 3651,
//!     "penaltyLen": 50,
//!     "firingLines": 1,
//!     "start": "09:30:00",
//!     "startDelta": "00:00:30"
//! }
//! ```

use crate::clock::ClockTime;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Race parameters, immutable for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfig {
    /// Number of main laps
    pub laps: u32,
    /// Main lap length in meters
    pub lap_len: u32,
    /// Penalty loop length in meters
    pub penalty_len: u32,
    /// Number of firing lines on the range
    pub firing_lines: u32,
    /// Scheduled race start
    pub start: ClockTime,
    /// Interval between competitor starts
    ///
    /// Stored as a clock-of-day value rather than a plain duration; the
    /// disqualification sweep reads it as an offset from midnight.
    pub start_delta: ClockTime,
}

impl RaceConfig {
    /// Load and validate a configuration file
    pub fn load_from_file(path: &Path) -> Result<RaceConfig> {
        log::info!("Loading race configuration from {:?}", path);

        let data = fs::read_to_string(path)?;
        let config: RaceConfig = serde_json::from_str(&data)?;
        config.validate()?;

        log::debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Reject parameter combinations the state machine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.laps == 0 {
            return Err(EngineError::Config("laps must be positive".into()));
        }
        if self.lap_len == 0 {
            return Err(EngineError::Config("lapLen must be positive".into()));
        }
        if self.penalty_len == 0 {
            return Err(EngineError::Config("penaltyLen must be positive".into()));
        }
        Ok(())
    }
}
