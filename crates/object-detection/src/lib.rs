//! Object Detection
//!
//! Boundary between the camera/accelerator and the decision layer. The
//! accelerator itself lives outside this workspace; what lives here is the
//! contract it must satisfy and the post-processing applied to its output.

pub mod detector;
pub mod frame;

pub use detector::{
    DetectionConfig, DetectionFilter, FilteredDetector, ObjectDetector, ScriptedDetector,
};
pub use frame::VideoFrame;

use thiserror::Error;

/// Detection error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("Invalid frame format")]
    InvalidFrame,

    #[error("No more frames to replay")]
    Exhausted,
}
