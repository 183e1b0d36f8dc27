//! Rule engine configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use traffic_objects::ProximityConfig;

use crate::RuleEngineError;

/// Rule engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Speed limit in force before any limit sign is seen
    pub initial_speed_limit: u32,

    /// Minimum time the car stays stopped after a forced stop (milliseconds)
    pub dwell_ms: u64,

    /// Consecutive frames without a stop sign before its latch is released
    pub stop_sign_clear_frames: u32,

    /// Per-class proximity thresholds
    pub proximity: ProximityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_speed_limit: 40,
            dwell_ms: 1000,
            stop_sign_clear_frames: 1,
            proximity: ProximityConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    /// Reject settings the engine cannot operate with
    pub fn validate(&self) -> Result<(), RuleEngineError> {
        if self.initial_speed_limit == 0 {
            return Err(RuleEngineError::Config(
                "initial_speed_limit must be positive".to_string(),
            ));
        }
        if self.stop_sign_clear_frames == 0 {
            return Err(RuleEngineError::Config(
                "stop_sign_clear_frames must be at least 1".to_string(),
            ));
        }
        for (name, pct) in [
            ("default_min_height_pct", self.proximity.default_min_height_pct),
            ("person_min_height_pct", self.proximity.person_min_height_pct),
        ] {
            if !(pct > 0.0 && pct < 1.0) {
                return Err(RuleEngineError::Config(format!(
                    "{} must be within (0, 1), got {}",
                    name, pct
                )));
            }
        }
        Ok(())
    }
}
