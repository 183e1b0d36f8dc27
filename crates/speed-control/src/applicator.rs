//! Speed applicator implementation

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::SpeedControlError;

/// Physical drive mechanism.
///
/// Range clamping is the actuator's concern; the applicator forwards values
/// untouched.
pub trait Actuator: Send {
    fn set_speed(&mut self, speed: u32) -> Result<(), SpeedControlError>;
}

/// Actuator that only remembers what it was told.
///
/// Clones share the same history, so a test can keep one handle while the
/// applicator owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    speeds: Arc<Mutex<Vec<u32>>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speeds received so far, oldest first
    pub fn speeds(&self) -> Vec<u32> {
        // push never leaves the history half-written
        self.speeds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Actuator for RecordingActuator {
    fn set_speed(&mut self, speed: u32) -> Result<(), SpeedControlError> {
        self.speeds
            .lock()
            .map_err(|e| SpeedControlError::Actuator(e.to_string()))?
            .push(speed);
        Ok(())
    }
}

/// Forwards each cycle's target speed to the actuator, if one is attached
pub struct SpeedApplicator {
    actuator: Option<Box<dyn Actuator>>,
    last_speed: Option<u32>,
    last_error: Option<SpeedControlError>,
}

impl SpeedApplicator {
    /// Applicator driving the given actuator
    pub fn new(actuator: Box<dyn Actuator>) -> Self {
        Self {
            actuator: Some(actuator),
            last_speed: None,
            last_error: None,
        }
    }

    /// Applicator with nothing attached; speeds are only recorded
    pub fn detached() -> Self {
        Self {
            actuator: None,
            last_speed: None,
            last_error: None,
        }
    }

    /// Forward a speed to the actuator.
    ///
    /// Never fails: an actuator error is logged and kept for inspection.
    pub fn apply(&mut self, speed: u32) {
        self.last_speed = Some(speed);

        let Some(actuator) = self.actuator.as_mut() else {
            debug!("No actuator attached, speed {} not forwarded", speed);
            return;
        };

        debug!("Actually setting car speed to {}", speed);
        match actuator.set_speed(speed) {
            Ok(()) => self.last_error = None,
            Err(e) => {
                warn!("Failed to set car speed to {}: {}", speed, e);
                self.last_error = Some(e);
            }
        }
    }

    pub fn last_speed(&self) -> Option<u32> {
        self.last_speed
    }

    /// Error from the most recent forward, if it failed
    pub fn last_error(&self) -> Option<&SpeedControlError> {
        self.last_error.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.actuator.is_some()
    }
}

impl Default for SpeedApplicator {
    fn default() -> Self {
        Self::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingActuator;

    impl Actuator for FailingActuator {
        fn set_speed(&mut self, _speed: u32) -> Result<(), SpeedControlError> {
            Err(SpeedControlError::Actuator("motor driver offline".to_string()))
        }
    }

    #[test]
    fn test_detached_applicator_records_speed() {
        let mut applicator = SpeedApplicator::detached();
        applicator.apply(25);

        assert!(!applicator.is_attached());
        assert_eq!(applicator.last_speed(), Some(25));
    }

    #[test]
    fn test_speeds_forwarded_in_order() {
        let actuator = RecordingActuator::new();
        let mut applicator = SpeedApplicator::new(Box::new(actuator.clone()));

        for speed in [40, 0, 40, 25] {
            applicator.apply(speed);
        }

        assert_eq!(actuator.speeds(), vec![40, 0, 40, 25]);
        assert!(applicator.last_error().is_none());
    }

    #[test]
    fn test_history_survives_poisoned_lock() {
        let actuator = RecordingActuator::new();
        let mut recorder = actuator.clone();
        recorder.set_speed(40).unwrap();

        let poisoner = actuator.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.speeds.lock().unwrap();
            panic!("recorder thread died");
        })
        .join();

        assert!(actuator.speeds.is_poisoned());
        assert_eq!(actuator.speeds(), vec![40]);
    }

    #[test]
    fn test_actuator_failure_is_not_propagated() {
        let mut applicator = SpeedApplicator::new(Box::new(FailingActuator));
        applicator.apply(40);

        assert_eq!(applicator.last_speed(), Some(40));
        assert!(matches!(
            applicator.last_error(),
            Some(SpeedControlError::Actuator(_))
        ));
    }
}
