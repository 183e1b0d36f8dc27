//! Recorded detection scenarios
//!
//! A scenario is what the accelerator reported for a sequence of frames,
//! stored as JSON:
//!
//! ```json
//! { "frames": [ [ { "class_id": 5, "confidence": 0.9,
//!                   "bbox": { "xmin": 10, "ymin": 20, "xmax": 60, "ymax": 140 } } ],
//!               [] ] }
//! ```

use std::path::Path;

use object_detection::ScriptedDetector;
use serde::{Deserialize, Serialize};
use tracing::info;
use traffic_objects::DetectedObject;

use crate::DriverError;

/// Detections for a sequence of frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub frames: Vec<Vec<DetectedObject>>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, DriverError> {
        serde_json::from_str(json).map_err(|e| DriverError::Scenario(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let scenario = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!("Loaded {} frames from {}", scenario.len(), path.display());
        Ok(scenario)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Detector replaying this scenario frame by frame
    pub fn into_detector(self) -> ScriptedDetector {
        ScriptedDetector::new(self.frames)
    }
}
