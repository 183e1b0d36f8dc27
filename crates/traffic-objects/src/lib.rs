//! Traffic Objects
//!
//! Vocabulary shared by the decision layer:
//! - Detected objects and frame geometry
//! - Sign classes and the label table that maps model class ids onto them
//! - The per-class handlers that turn a close-by object into a speed verdict
//! - The car state those handlers mutate

pub mod handler;
pub mod labels;
pub mod object;
pub mod sign;
pub mod state;

pub use handler::{ProximityConfig, StopSignLatch, TrafficObject};
pub use labels::{Label, LabelTable};
pub use object::{BoundingBox, DetectedObject, FrameSize};
pub use sign::SignClass;
pub use state::CarState;

use thiserror::Error;

/// Traffic object error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrafficObjectError {
    #[error("Malformed label on line {line}: {content:?}")]
    MalformedLabel { line: usize, content: String },

    #[error("Label does not name a known traffic sign: {0}")]
    UnknownLabel(String),

    #[error("Class id {0} appears more than once in the label table")]
    DuplicateClassId(u32),

    #[error("Invalid speed limit: {0}")]
    InvalidSpeedLimit(String),

    #[error("Label file error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TrafficObjectError {
    fn from(err: std::io::Error) -> Self {
        TrafficObjectError::Io(err.to_string())
    }
}
