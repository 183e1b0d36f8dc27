//! Car state shared between the engine and the sign handlers

use serde::{Deserialize, Serialize};

/// Target speed and speed limit for one control cycle.
///
/// `speed <= speed_limit` is not enforced: a stopping handler zeroes `speed`
/// while the limit in force stays positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarState {
    /// Target speed for the next cycle
    pub speed: u32,

    /// Speed limit currently in force
    pub speed_limit: u32,
}

impl CarState {
    /// State for proceeding at the given limit
    pub fn at_limit(speed_limit: u32) -> Self {
        Self {
            speed: speed_limit,
            speed_limit,
        }
    }

    /// Force a full stop, keeping the limit in force
    pub fn stop(&mut self) {
        self.speed = 0;
    }

    /// Resume at the limit in force
    pub fn resume(&mut self) {
        self.speed = self.speed_limit;
    }

    pub fn is_stopped(&self) -> bool {
        self.speed == 0
    }
}
