//! Road Driver - replay entry point
//!
//! Replays a recorded detection scenario through the traffic rule engine,
//! standing in for the camera and accelerator.
//!
//! Usage: `road-driver [config.toml]`; the scenario file is taken from
//! `scenario_path` in the configuration (or `DRIVER__SCENARIO_PATH`).

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use driver::{init_logging, load_config, spawn_pipeline, ObjectsOnRoadProcessor, Scenario};
use object_detection::{FilteredDetector, VideoFrame};
use rule_engine::{NoDwell, RuleEngine};
use speed_control::SpeedApplicator;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("=== Road Driver v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref()).context("loading configuration")?;
    let labels = config.labels().context("loading label table")?;

    let scenario_path = config
        .scenario_path
        .clone()
        .ok_or_else(|| anyhow!("no scenario_path configured"))?;
    let scenario = Scenario::from_path(&scenario_path)
        .with_context(|| format!("loading scenario {}", scenario_path.display()))?;
    let frame_count = scenario.len();

    let detector = FilteredDetector::new(scenario.into_detector(), config.detection.clone());
    // The pipeline waits out stops on its own timer
    let engine = RuleEngine::with_dwell(config.engine.clone(), labels, NoDwell)?;
    let processor = ObjectsOnRoadProcessor::new(detector, engine, SpeedApplicator::detached());

    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let pipeline = spawn_pipeline(processor, rx);

    let frame_size = config.frame_size();
    for sequence in 0..frame_count {
        let frame = VideoFrame::placeholder(frame_size, sequence as u32);
        if tx.send(frame).await.is_err() {
            // Pipeline ended early; its error surfaces below
            break;
        }
    }
    drop(tx);

    let summary = pipeline.await??;
    info!(
        "Replayed {} frames: {} stops, {} unknown detections",
        summary.frames(),
        summary.stops,
        summary.anomalies
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
