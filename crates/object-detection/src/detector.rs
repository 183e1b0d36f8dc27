//! Detector contract, confidence filtering and replay

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;
use traffic_objects::DetectedObject;

use crate::{DetectionError, VideoFrame};

/// Anything that turns a frame into classified, scored, located objects
pub trait ObjectDetector {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<DetectedObject>, DetectionError>;
}

/// Detection post-processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum score for a detection to reach the rule engine
    pub min_confidence: f32,

    /// Maximum detections kept per frame
    pub max_objects: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.30,
            max_objects: 3,
        }
    }
}

/// Drops low-confidence detections and keeps the best `max_objects`
#[derive(Debug, Clone, Default)]
pub struct DetectionFilter {
    config: DetectionConfig,
}

impl DetectionFilter {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Filter one frame's detections, highest confidence first
    pub fn apply(&self, detections: Vec<DetectedObject>) -> Vec<DetectedObject> {
        let mut kept: Vec<_> = detections
            .into_iter()
            .filter(|obj| {
                let keep = obj.confidence >= self.config.min_confidence;
                if !keep {
                    debug!(
                        "Dropping class {} at {:.0}% confidence",
                        obj.class_id,
                        obj.confidence * 100.0
                    );
                }
                keep
            })
            .collect();

        kept.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        kept.truncate(self.config.max_objects);
        kept
    }
}

/// Detector wrapped with a [`DetectionFilter`]
pub struct FilteredDetector<D> {
    inner: D,
    filter: DetectionFilter,
}

impl<D: ObjectDetector> FilteredDetector<D> {
    pub fn new(inner: D, config: DetectionConfig) -> Self {
        Self {
            inner,
            filter: DetectionFilter::new(config),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: ObjectDetector> ObjectDetector for FilteredDetector<D> {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<DetectedObject>, DetectionError> {
        let raw = self.inner.detect(frame)?;
        let kept = self.filter.apply(raw);

        if kept.is_empty() {
            debug!("No object detected");
        }
        for obj in &kept {
            debug!(
                "class {}, {:.0}% w={:.0} h={:.0}",
                obj.class_id,
                obj.confidence * 100.0,
                obj.bbox.width(),
                obj.bbox.height()
            );
        }
        Ok(kept)
    }
}

/// Replays recorded detections, one list per frame
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector {
    frames: VecDeque<Vec<DetectedObject>>,
}

impl ScriptedDetector {
    pub fn new(frames: impl IntoIterator<Item = Vec<DetectedObject>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Frames left to replay
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl ObjectDetector for ScriptedDetector {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<DetectedObject>, DetectionError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(DetectionError::InvalidFrame);
        }
        self.frames.pop_front().ok_or(DetectionError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use traffic_objects::{BoundingBox, FrameSize};

    fn detection(class_id: u32, confidence: f32) -> DetectedObject {
        DetectedObject::new(class_id, confidence, BoundingBox::new(0.0, 0.0, 50.0, 50.0))
    }

    #[test]
    fn test_filter_drops_low_confidence() {
        let filter = DetectionFilter::default();
        let kept = filter.apply(vec![detection(0, 0.29), detection(1, 0.30), detection(2, 0.8)]);

        let ids: Vec<_> = kept.iter().map(|obj| obj.class_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_filter_keeps_best_objects() {
        let filter = DetectionFilter::default();
        let kept = filter.apply(vec![
            detection(0, 0.5),
            detection(1, 0.9),
            detection(2, 0.4),
            detection(3, 0.7),
        ]);

        let ids: Vec<_> = kept.iter().map(|obj| obj.class_id).collect();
        assert_eq!(ids, vec![1, 3, 0]);
    }

    #[test]
    fn test_filter_drops_nan_confidence() {
        let filter = DetectionFilter::default();
        assert!(filter.apply(vec![detection(0, f32::NAN)]).is_empty());
    }

    #[test]
    fn test_scripted_detector_replays_in_order() {
        let mut detector = ScriptedDetector::new(vec![vec![detection(5, 0.9)], vec![]]);
        let frame = VideoFrame::placeholder(FrameSize::default(), 0);

        assert_eq!(detector.detect(&frame).unwrap().len(), 1);
        assert!(detector.detect(&frame).unwrap().is_empty());
        assert_eq!(detector.detect(&frame), Err(DetectionError::Exhausted));
    }

    #[test]
    fn test_scripted_detector_rejects_empty_frame() {
        let mut detector = ScriptedDetector::new(vec![vec![]]);
        let frame = VideoFrame::placeholder(FrameSize::new(0, 0), 0);
        assert_eq!(detector.detect(&frame), Err(DetectionError::InvalidFrame));
        assert_eq!(detector.remaining(), 1);
    }

    #[test]
    fn test_filtered_detector() {
        let scripted = ScriptedDetector::new(vec![vec![detection(1, 0.1), detection(2, 0.95)]]);
        let mut detector = FilteredDetector::new(scripted, DetectionConfig::default());
        let frame = VideoFrame::placeholder(FrameSize::default(), 0);

        let kept = detector.detect(&frame).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].class_id, 2);
        assert_eq!(detector.inner().remaining(), 0);
    }

    proptest! {
        #[test]
        fn prop_filter_output_bounded_and_sorted(
            scores in prop::collection::vec(0.0f32..1.0, 0..10)
        ) {
            let filter = DetectionFilter::default();
            let input: Vec<_> = scores.iter().enumerate()
                .map(|(i, s)| detection(i as u32, *s))
                .collect();
            let kept = filter.apply(input);

            prop_assert!(kept.len() <= 3);
            prop_assert!(kept.iter().all(|obj| obj.confidence >= 0.30));
            prop_assert!(kept.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        }
    }
}
