//! Stop dwell policies
//!
//! After a forced stop the engine must keep the car stopped for a minimum
//! time before it looks at the next frame. How that time is spent is up to
//! the host: block the thread, or skip it entirely under test.

use std::time::Duration;

use tracing::debug;

/// Waits out a mandatory stop
pub trait Dwell {
    fn hold(&mut self, duration: Duration);
}

/// Blocks the calling thread for the full dwell
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingDwell;

impl Dwell for BlockingDwell {
    fn hold(&mut self, duration: Duration) {
        debug!("full stop for {:?}", duration);
        std::thread::sleep(duration);
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDwell;

impl Dwell for NoDwell {
    fn hold(&mut self, _duration: Duration) {}
}

/// Records every requested hold without waiting
#[derive(Debug, Clone, Default)]
pub struct RecordingDwell {
    holds: Vec<Duration>,
}

impl RecordingDwell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds requested so far, oldest first
    pub fn holds(&self) -> &[Duration] {
        &self.holds
    }
}

impl Dwell for RecordingDwell {
    fn hold(&mut self, duration: Duration) {
        self.holds.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_blocking_dwell_waits() {
        let start = Instant::now();
        BlockingDwell.hold(Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_recording_dwell() {
        let mut dwell = RecordingDwell::new();
        dwell.hold(Duration::from_secs(1));
        dwell.hold(Duration::from_millis(5));
        assert_eq!(
            dwell.holds(),
            &[Duration::from_secs(1), Duration::from_millis(5)]
        );
    }
}
