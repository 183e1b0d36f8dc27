//! Async frame pipeline
//!
//! A producer (camera, replay) pushes frames into a channel; a single task
//! runs them through the processor one at a time, so the rule engine never
//! sees two frames concurrently. Mandatory stops are waited out with a timer
//! instead of blocking a runtime thread.

use object_detection::{ObjectDetector, VideoFrame};
use rule_engine::{CycleReport, Dwell};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use traffic_objects::CarState;

use crate::{DriverError, ObjectsOnRoadProcessor};

/// What the pipeline did before its input closed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineSummary {
    /// Decision for every processed frame, in order
    pub states: Vec<CarState>,

    /// Cycles that ended in a full stop
    pub stops: usize,

    /// Detections with class ids missing from the label table
    pub anomalies: usize,
}

impl PipelineSummary {
    fn record(&mut self, report: &CycleReport) {
        self.states.push(report.car_state);
        if report.car_state.is_stopped() {
            self.stops += 1;
        }
        self.anomalies += report.anomalies.len();
    }

    pub fn frames(&self) -> usize {
        self.states.len()
    }
}

/// Run the processor over every frame received until the sender is dropped
pub fn spawn_pipeline<T, D>(
    mut processor: ObjectsOnRoadProcessor<T, D>,
    mut frames: mpsc::Receiver<VideoFrame>,
) -> JoinHandle<Result<PipelineSummary, DriverError>>
where
    T: ObjectDetector + Send + 'static,
    D: Dwell + Send + 'static,
{
    tokio::spawn(async move {
        let mut summary = PipelineSummary::default();

        while let Some(frame) = frames.recv().await {
            let report = processor.evaluate_frame(&frame)?;
            info!(
                frame = frame.sequence,
                speed = report.car_state.speed,
                speed_limit = report.car_state.speed_limit,
                "Cycle complete"
            );
            summary.record(&report);

            if let Some(duration) = report.dwell {
                debug!("full stop for {:?}", duration);
                tokio::time::sleep(duration).await;
            }
        }

        info!(
            "Pipeline finished after {} frames ({} stops)",
            summary.frames(),
            summary.stops
        );
        Ok(summary)
    })
}
