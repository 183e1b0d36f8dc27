//! Traffic Rule Engine
//!
//! Decides the vehicle's target speed for each camera frame:
//! - Resolves detections through the label table
//! - Gates every object on its proximity predicate
//! - Merges handler verdicts in a fixed precedence order
//! - Tracks the stop-sign episode across frames
//! - Enforces the minimum stop dwell

pub mod config;
pub mod dwell;
pub mod engine;

pub use config::EngineConfig;
pub use dwell::{BlockingDwell, Dwell, NoDwell, RecordingDwell};
pub use engine::{CycleReport, RuleEngine};

use thiserror::Error;
use traffic_objects::TrafficObjectError;

/// Rule engine error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleEngineError {
    #[error("Class id {class_id} is not in the label table")]
    UnknownClass { class_id: u32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Label table error: {0}")]
    Labels(#[from] TrafficObjectError),
}
