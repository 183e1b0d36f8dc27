//! Per-class traffic object handlers
//!
//! Each handler decides whether a detection is close enough to act on and,
//! if so, how it changes the car state for the current cycle. Only the stop
//! sign carries state from one frame to the next.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CarState, DetectedObject, SignClass};

/// Proximity thresholds, as the fraction of frame height a bounding box must
/// exceed before the object is acted on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Threshold for lights and signs
    pub default_min_height_pct: f32,

    /// Threshold for pedestrians
    pub person_min_height_pct: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            default_min_height_pct: 0.05,
            person_min_height_pct: 0.10,
        }
    }
}

impl ProximityConfig {
    /// Threshold that applies to a sign class
    pub fn min_height_pct(&self, class: SignClass) -> f32 {
        match class {
            SignClass::Person => self.person_min_height_pct,
            _ => self.default_min_height_pct,
        }
    }
}

/// Stop-sign episode latch.
///
/// Set when a stop sign first forces a stop; while set, the same sign no
/// longer stops the car. Cleared after `clear_after` consecutive frames
/// without any stop sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopSignLatch {
    has_stopped: bool,
    absent_frames: u32,
    clear_after: u32,
}

impl StopSignLatch {
    pub fn new(clear_after: u32) -> Self {
        Self {
            has_stopped: false,
            absent_frames: 0,
            clear_after: clear_after.max(1),
        }
    }

    /// Whether a stop has already been made for the sign in view
    pub fn has_stopped(&self) -> bool {
        self.has_stopped
    }
}

/// Handler for one sign class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrafficObject {
    GreenTrafficLight,
    RedTrafficLight,
    Person,
    SpeedLimit { limit: u32 },
    StopSign(StopSignLatch),
}

impl TrafficObject {
    /// Create the handler for a sign class
    pub fn for_class(class: SignClass, stop_sign_clear_frames: u32) -> Self {
        match class {
            SignClass::GreenLight => TrafficObject::GreenTrafficLight,
            SignClass::RedLight => TrafficObject::RedTrafficLight,
            SignClass::Person => TrafficObject::Person,
            SignClass::SpeedLimit(limit) => TrafficObject::SpeedLimit { limit },
            SignClass::StopSign => {
                TrafficObject::StopSign(StopSignLatch::new(stop_sign_clear_frames))
            }
        }
    }

    pub fn class(&self) -> SignClass {
        match self {
            TrafficObject::GreenTrafficLight => SignClass::GreenLight,
            TrafficObject::RedTrafficLight => SignClass::RedLight,
            TrafficObject::Person => SignClass::Person,
            TrafficObject::SpeedLimit { limit } => SignClass::SpeedLimit(*limit),
            TrafficObject::StopSign(_) => SignClass::StopSign,
        }
    }

    /// Whether the object appears large enough, hence near enough, to act on
    pub fn is_close_by(
        &self,
        obj: &DetectedObject,
        frame_height: u32,
        proximity: &ProximityConfig,
    ) -> bool {
        if !obj.bbox.is_valid() || frame_height == 0 {
            return false;
        }
        let height_pct = obj.bbox.height() / frame_height as f32;
        height_pct > proximity.min_height_pct(self.class())
    }

    /// Apply this object's verdict to the cycle's car state
    pub fn set_car_state(&mut self, car_state: &mut CarState) {
        match self {
            TrafficObject::GreenTrafficLight => {
                debug!("green light: resume at {}", car_state.speed_limit);
                car_state.resume();
            }
            TrafficObject::RedTrafficLight => {
                debug!("red light: stopping car");
                car_state.stop();
            }
            TrafficObject::Person => {
                debug!("pedestrian: stopping car");
                car_state.stop();
            }
            TrafficObject::SpeedLimit { limit } => {
                debug!("speed limit: set limit to {}", limit);
                car_state.speed_limit = *limit;
                car_state.speed = *limit;
            }
            TrafficObject::StopSign(latch) => {
                latch.absent_frames = 0;
                if latch.has_stopped {
                    debug!("stop sign: already stopped for this sign, proceeding");
                } else {
                    debug!("stop sign: just detected, stopping car");
                    latch.has_stopped = true;
                    car_state.stop();
                }
            }
        }
    }

    /// Note a frame where this object is in view, close or not.
    ///
    /// Restarts the stop sign's count of frames without a sign, so only
    /// consecutive empty frames release its latch.
    pub fn seen(&mut self) {
        if let TrafficObject::StopSign(latch) = self {
            latch.absent_frames = 0;
        }
    }

    /// Note a frame without this object.
    ///
    /// Only the stop sign reacts; once enough consecutive frames have passed
    /// its latch is released so the next stop sign stops the car again.
    pub fn clear(&mut self) {
        if let TrafficObject::StopSign(latch) = self {
            if !latch.has_stopped {
                return;
            }
            latch.absent_frames += 1;
            if latch.absent_frames >= latch.clear_after {
                debug!("stop sign: no more stop sign detected");
                latch.has_stopped = false;
                latch.absent_frames = 0;
            }
        }
    }
}
