//! Speed Control
//!
//! Thin pass-through from the rule engine's decision to the drive motor.
//! Runs without an actuator so the decision layer can be tested off-vehicle.

mod applicator;

pub use applicator::{Actuator, RecordingActuator, SpeedApplicator};

use thiserror::Error;

/// Speed control error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeedControlError {
    #[error("Actuator error: {0}")]
    Actuator(String),
}
