//! Rule engine implementation

use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, warn};
use traffic_objects::{CarState, DetectedObject, FrameSize, LabelTable, SignClass, TrafficObject};

use crate::dwell::{BlockingDwell, Dwell};
use crate::{EngineConfig, RuleEngineError};

/// Outcome of one control cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    /// Speed decision for the next cycle
    pub car_state: CarState,

    /// Mandatory stop the caller must honour before the next cycle
    pub dwell: Option<Duration>,

    /// Detections that could not be acted on because of a configuration
    /// mismatch
    #[serde(skip)]
    pub anomalies: Vec<RuleEngineError>,
}

/// Stateful traffic rule engine.
///
/// Owns one handler per sign class for its whole lifetime, so stop-sign
/// state carries over between frames. Not safe for concurrent `process`
/// calls; callers feeding frames from several threads must serialize them.
pub struct RuleEngine<D: Dwell = BlockingDwell> {
    config: EngineConfig,
    labels: LabelTable,
    handlers: HashMap<SignClass, TrafficObject>,
    speed: u32,
    speed_limit: u32,
    dwell: D,
}

impl RuleEngine<BlockingDwell> {
    /// Create an engine that blocks the calling thread during stops
    pub fn new(config: EngineConfig, labels: LabelTable) -> Result<Self, RuleEngineError> {
        Self::with_dwell(config, labels, BlockingDwell)
    }
}

impl<D: Dwell> RuleEngine<D> {
    /// Create an engine with a custom dwell policy
    pub fn with_dwell(
        config: EngineConfig,
        labels: LabelTable,
        dwell: D,
    ) -> Result<Self, RuleEngineError> {
        config.validate()?;
        info!("Creating rule engine with config: {:?}", config);

        let handlers = labels
            .iter()
            .map(|(_, label)| {
                let handler = TrafficObject::for_class(label.class, config.stop_sign_clear_frames);
                (label.class, handler)
            })
            .collect();

        Ok(Self {
            speed: config.initial_speed_limit,
            speed_limit: config.initial_speed_limit,
            config,
            labels,
            handlers,
            dwell,
        })
    }

    /// Run one cycle and wait out any mandatory stop before returning
    pub fn process(&mut self, detections: &[DetectedObject], frame: FrameSize) -> CycleReport {
        let report = self.evaluate(detections, frame);
        if let Some(duration) = report.dwell {
            self.dwell.hold(duration);
        }
        report
    }

    /// Run one cycle without waiting.
    ///
    /// The returned report carries the dwell the caller is responsible for
    /// honouring before the next cycle.
    pub fn evaluate(&mut self, detections: &[DetectedObject], frame: FrameSize) -> CycleReport {
        counter!("rule_engine_cycles_total").increment(1);

        let mut car_state = CarState::at_limit(self.speed_limit);
        let mut anomalies = Vec::new();
        let mut close_by = Vec::new();
        let mut contains_stop_sign = false;

        if detections.is_empty() {
            debug!("No objects detected, drive at speed limit of {}", self.speed_limit);
        }

        for obj in detections {
            let Some(label) = self.labels.get(obj.class_id) else {
                warn!("Class id {} is not in the label table, ignoring", obj.class_id);
                counter!("rule_engine_unknown_class_total").increment(1);
                anomalies.push(RuleEngineError::UnknownClass {
                    class_id: obj.class_id,
                });
                continue;
            };

            if label.class == SignClass::StopSign {
                contains_stop_sign = true;
            }

            let stop_sign_clear_frames = self.config.stop_sign_clear_frames;
            let handler = self
                .handlers
                .entry(label.class)
                .or_insert_with(|| TrafficObject::for_class(label.class, stop_sign_clear_frames));

            if handler.is_close_by(obj, frame.height, &self.config.proximity) {
                debug!("[{}] object detected close by", label.name);
                close_by.push(label.class);
            } else {
                debug!("[{}] object detected, but it is too far, ignoring", label.name);
            }
        }

        // Stopping classes go last so no limit or green light can undo them;
        // among limit signs the lowest value is applied last and wins.
        close_by.sort_by_key(|class| {
            let limit = match class {
                SignClass::SpeedLimit(limit) => *limit,
                _ => 0,
            };
            (class.precedence(), Reverse(limit))
        });
        for class in &close_by {
            if let Some(handler) = self.handlers.get_mut(class) {
                handler.set_car_state(&mut car_state);
            }
        }

        for handler in self.handlers.values_mut() {
            if contains_stop_sign {
                handler.seen();
            } else {
                handler.clear();
            }
        }

        let dwell = self.resume_driving(car_state);

        CycleReport {
            car_state: self.car_state(),
            dwell,
            anomalies,
        }
    }

    /// Commit the cycle's verdict and report the dwell it requires
    fn resume_driving(&mut self, car_state: CarState) -> Option<Duration> {
        let old_speed = self.speed;
        self.speed_limit = car_state.speed_limit;
        self.speed = car_state.speed;

        if old_speed != self.speed {
            info!("Current Speed = {}, New Speed = {}", old_speed, self.speed);
        } else {
            debug!("Current Speed = {}, New Speed = {}", old_speed, self.speed);
        }

        if self.speed == 0 {
            counter!("rule_engine_stops_total").increment(1);
            Some(self.config.dwell())
        } else {
            None
        }
    }

    /// Decision of the last completed cycle
    pub fn car_state(&self) -> CarState {
        CarState {
            speed: self.speed,
            speed_limit: self.speed_limit,
        }
    }

    /// Forget all cross-frame state and return to the initial limit
    pub fn reset(&mut self) {
        let clear_frames = self.config.stop_sign_clear_frames;
        for (class, handler) in self.handlers.iter_mut() {
            *handler = TrafficObject::for_class(*class, clear_frames);
        }
        self.speed = self.config.initial_speed_limit;
        self.speed_limit = self.config.initial_speed_limit;
        info!("Rule engine reset to speed limit {}", self.speed_limit);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn dwell(&self) -> &D {
        &self.dwell
    }
}
