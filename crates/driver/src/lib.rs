//! Road Driver
//!
//! Per-frame driving loop: detections go through the traffic rule engine and
//! the resulting target speed goes to the drive actuator.

pub mod config;
pub mod pipeline;
pub mod processor;
pub mod scenario;

pub use crate::config::{load_config, DriverConfig};
pub use pipeline::{spawn_pipeline, PipelineSummary};
pub use processor::ObjectsOnRoadProcessor;
pub use scenario::Scenario;

use object_detection::DetectionError;
use rule_engine::RuleEngineError;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use traffic_objects::TrafficObjectError;

/// Driver error types
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Rule engine error: {0}")]
    Rules(#[from] RuleEngineError),

    #[error("Label table error: {0}")]
    Labels(#[from] TrafficObjectError),

    #[error("Detection failed: {0}")]
    Detection(#[from] DetectionError),

    #[error("Invalid scenario: {0}")]
    Scenario(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize logging.
///
/// Honours `RUST_LOG`, defaulting to `info`. Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
