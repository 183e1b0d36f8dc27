//! Per-frame objects-on-road processing

use object_detection::{ObjectDetector, VideoFrame};
use rule_engine::{CycleReport, Dwell, RuleEngine};
use speed_control::SpeedApplicator;
use tracing::{debug, info};

use crate::DriverError;

/// Detects what is on the road and adjusts the car's speed accordingly
pub struct ObjectsOnRoadProcessor<T, D: Dwell> {
    detector: T,
    engine: RuleEngine<D>,
    applicator: SpeedApplicator,
}

impl<T: ObjectDetector, D: Dwell> ObjectsOnRoadProcessor<T, D> {
    pub fn new(detector: T, engine: RuleEngine<D>, applicator: SpeedApplicator) -> Self {
        info!(
            "Creating objects-on-road processor (actuator attached: {})",
            applicator.is_attached()
        );
        Self {
            detector,
            engine,
            applicator,
        }
    }

    /// Process one frame, waiting out any mandatory stop before returning
    pub fn process_objects_on_road(
        &mut self,
        frame: &VideoFrame,
    ) -> Result<CycleReport, DriverError> {
        debug!("Processing objects, frame {}", frame.sequence);
        let detections = self.detector.detect(frame)?;
        let report = self.engine.process(&detections, frame.size());
        self.applicator.apply(report.car_state.speed);
        Ok(report)
    }

    /// Process one frame without waiting.
    ///
    /// The speed is applied immediately; the caller must honour
    /// `report.dwell` before submitting the next frame.
    pub fn evaluate_frame(&mut self, frame: &VideoFrame) -> Result<CycleReport, DriverError> {
        debug!("Evaluating objects, frame {}", frame.sequence);
        let detections = self.detector.detect(frame)?;
        let report = self.engine.evaluate(&detections, frame.size());
        self.applicator.apply(report.car_state.speed);
        Ok(report)
    }

    pub fn engine(&self) -> &RuleEngine<D> {
        &self.engine
    }

    pub fn applicator(&self) -> &SpeedApplicator {
        &self.applicator
    }

    pub fn detector(&self) -> &T {
        &self.detector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_detection::{DetectionConfig, DetectionError, FilteredDetector, ScriptedDetector};
    use rule_engine::{EngineConfig, RecordingDwell};
    use speed_control::RecordingActuator;
    use std::time::Duration;
    use traffic_objects::{BoundingBox, CarState, DetectedObject, FrameSize, LabelTable};

    fn sign(class_id: u32) -> DetectedObject {
        DetectedObject::new(class_id, 0.8, BoundingBox::new(300.0, 120.0, 380.0, 260.0))
    }

    fn processor(
        frames: Vec<Vec<DetectedObject>>,
        actuator: &RecordingActuator,
    ) -> ObjectsOnRoadProcessor<FilteredDetector<ScriptedDetector>, RecordingDwell> {
        let detector =
            FilteredDetector::new(ScriptedDetector::new(frames), DetectionConfig::default());
        let engine = RuleEngine::with_dwell(
            EngineConfig::default(),
            LabelTable::default(),
            RecordingDwell::new(),
        )
        .unwrap();
        ObjectsOnRoadProcessor::new(
            detector,
            engine,
            SpeedApplicator::new(Box::new(actuator.clone())),
        )
    }

    #[test]
    fn test_car_at_stop_sign() {
        let actuator = RecordingActuator::new();
        let mut processor = processor(
            vec![vec![sign(5)], vec![sign(5)], vec![sign(5)], vec![sign(0)]],
            &actuator,
        );
        let frame = VideoFrame::placeholder(FrameSize::default(), 0);

        let states: Vec<CarState> = (0..4)
            .map(|_| processor.process_objects_on_road(&frame).unwrap().car_state)
            .collect();

        assert_eq!(
            states.iter().map(|s| s.speed).collect::<Vec<_>>(),
            vec![0, 40, 40, 40]
        );
        assert_eq!(actuator.speeds(), vec![0, 40, 40, 40]);
        assert_eq!(processor.engine().dwell().holds(), &[Duration::from_secs(1)]);
    }

    #[test]
    fn test_low_confidence_person_ignored() {
        let actuator = RecordingActuator::new();
        let mut person = sign(1);
        person.confidence = 0.1;
        let mut processor = processor(vec![vec![person]], &actuator);
        let frame = VideoFrame::placeholder(FrameSize::default(), 0);

        let report = processor.process_objects_on_road(&frame).unwrap();
        assert_eq!(report.car_state, CarState::at_limit(40));
    }

    #[test]
    fn test_evaluate_frame_defers_dwell_to_caller() {
        let actuator = RecordingActuator::new();
        let mut processor = processor(vec![vec![sign(2)]], &actuator);
        let frame = VideoFrame::placeholder(FrameSize::default(), 0);

        let report = processor.evaluate_frame(&frame).unwrap();
        assert_eq!(report.dwell, Some(Duration::from_secs(1)));
        assert!(processor.engine().dwell().holds().is_empty());
        assert_eq!(actuator.speeds(), vec![0]);
    }

    #[test]
    fn test_detector_errors_propagate() {
        let actuator = RecordingActuator::new();
        let mut processor = processor(vec![], &actuator);
        let frame = VideoFrame::placeholder(FrameSize::default(), 0);

        assert!(matches!(
            processor.process_objects_on_road(&frame),
            Err(DriverError::Detection(DetectionError::Exhausted))
        ));
        assert!(actuator.speeds().is_empty());
    }
}
