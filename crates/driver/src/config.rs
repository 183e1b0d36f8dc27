//! Driver configuration

use std::path::{Path, PathBuf};

use ::config::{Config, ConfigError, Environment, File};
use object_detection::DetectionConfig;
use rule_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use tracing::info;
use traffic_objects::{FrameSize, LabelTable};

use crate::DriverError;

/// Driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Traffic rule settings
    pub engine: EngineConfig,

    /// Detection post-processing
    pub detection: DetectionConfig,

    /// Camera frame width (pixels)
    pub frame_width: u32,

    /// Camera frame height (pixels)
    pub frame_height: u32,

    /// Label file; the stock road sign labels are used when absent
    pub labels_path: Option<PathBuf>,

    /// Recorded detections to replay
    pub scenario_path: Option<PathBuf>,

    /// Frames buffered between producer and rule engine
    pub channel_capacity: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            detection: DetectionConfig::default(),
            frame_width: 640,
            frame_height: 480,
            labels_path: None,
            scenario_path: None,
            channel_capacity: 8,
        }
    }
}

impl DriverConfig {
    pub fn frame_size(&self) -> FrameSize {
        FrameSize::new(self.frame_width, self.frame_height)
    }

    /// Load the configured label table
    pub fn labels(&self) -> Result<LabelTable, DriverError> {
        match &self.labels_path {
            Some(path) => Ok(LabelTable::from_path(path)?),
            None => Ok(LabelTable::default()),
        }
    }
}

/// Load configuration.
///
/// Layers, later ones winning: built-in defaults, the optional TOML file,
/// then `DRIVER__`-prefixed environment variables
/// (e.g. `DRIVER__ENGINE__DWELL_MS=500`).
pub fn load_config(path: Option<&Path>) -> Result<DriverConfig, DriverError> {
    let mut builder = Config::builder().add_source(Config::try_from(&DriverConfig::default())?);

    if let Some(path) = path {
        info!("Loading configuration from {}", path.display());
        builder = builder.add_source(File::from(path));
    }

    let mut config: DriverConfig = builder
        .add_source(
            Environment::with_prefix("DRIVER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    if let Some(path) = path {
        let file_layer = Config::builder().add_source(File::from(path)).build()?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        relative_to_file(&mut config.labels_path, &file_layer, "labels_path", base);
        relative_to_file(&mut config.scenario_path, &file_layer, "scenario_path", base);
    }

    config.engine.validate()?;
    if config.frame_height == 0 {
        return Err(ConfigError::Message("frame_height must be positive".to_string()).into());
    }
    if config.channel_capacity == 0 {
        return Err(ConfigError::Message("channel_capacity must be positive".to_string()).into());
    }

    Ok(config)
}

/// Resolve a relative path that came from the config file against the
/// file's directory. Paths from the environment stay relative to the
/// working directory.
fn relative_to_file(value: &mut Option<PathBuf>, file_layer: &Config, key: &str, base: &Path) {
    let Some(current) = value.as_ref() else {
        return;
    };
    let from_file = file_layer.get_string(key).ok().map(PathBuf::from);
    if current.is_relative() && from_file.as_ref() == Some(current) {
        *value = Some(base.join(current));
    }
}
