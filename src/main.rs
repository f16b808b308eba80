// src/main.rs
//
// Reference frame driver. Replays a JSON-lines log of tracked detections
// (one frame per line) through the prediction core and hands dangerous
// verdicts to the alert dispatcher.
//
// Usage: collision_prediction <detections.jsonl> [--config config.yaml] [--report report.jsonl]

use anyhow::{Context, Result};
use clap::Parser;
use collision_prediction::alert::AlertDispatcher;
use collision_prediction::pipeline::{FrameInput, FrameProcessor, PipelineMetrics};
use collision_prediction::types::Config;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

/// Replay tracked detections through the collision predictor
#[derive(Parser, Debug)]
#[command(name = "collision_prediction")]
struct Args {
    /// JSON-lines detection log, one frame per line
    input: PathBuf,

    /// YAML configuration; built-in defaults are used when it is missing
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Write one JSON frame report per line to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("collision_prediction={}", level))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Subscriber goes in before the config is read so load warnings are
    // visible. RUST_LOG wins over logging.level.
    let rust_log = EnvFilter::try_from_default_env().ok();
    let from_env = rust_log.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(rust_log.unwrap_or_else(|| level_filter("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let config = Config::load_or_default(&args.config)?;
    if !from_env {
        filter_handle
            .reload(level_filter(&config.logging.level))
            .context("failed to apply logging.level")?;
    }

    info!("🚗 Collision prediction starting");
    info!(
        "✓ Configuration loaded from {} (window={} frames, horizon={:.1}s)",
        args.config.display(),
        config.prediction.position_history_frames,
        config.prediction.seconds_to_predict
    );

    let metrics = PipelineMetrics::new();
    let dispatcher = AlertDispatcher::spawn(&config.alert, metrics.clone());
    let mut processor = FrameProcessor::new(config, metrics.clone());

    let input = File::open(&args.input)
        .with_context(|| format!("failed to open detections {}", args.input.display()))?;
    let mut report_out = match &args.report {
        Some(path) => Some(BufWriter::new(File::create(path).with_context(|| {
            format!("failed to create report {}", path.display())
        })?)),
        None => None,
    };

    for (line_no, line) in BufReader::new(input).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", args.input.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let frame: FrameInput = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no + 1, e);
                continue;
            }
        };

        let report = processor.process(&frame);
        for obj in report.dangerous() {
            info!(
                "⚠️  Frame {}: object {} ({}) → {}",
                report.frame_id, obj.id, obj.class_label, obj.assessment.verdict.reason
            );
        }

        if let Some(out) = report_out.as_mut() {
            let json_line = serde_json::to_string(&report)?;
            writeln!(out, "{}", json_line)?;
        }

        for intent in processor.events().drain_alerts() {
            if let Err(e) = dispatcher.send(intent).await {
                error!("Failed to dispatch alert: {:#}", e);
            }
        }
    }

    if let Some(mut out) = report_out {
        out.flush()?;
    }
    dispatcher.shutdown().await?;

    let summary = metrics.summary();
    info!("✓ Replay finished");
    info!("  Frames: {} ({:.1} FPS)", summary.total_frames, summary.fps);
    info!("  Objects evaluated: {}", summary.objects_evaluated);
    info!("  Dangerous verdicts: {}", summary.dangerous_verdicts);
    info!(
        "  Alerts dispatched: {} (suppressed {})",
        summary.alerts_dispatched, summary.alerts_suppressed
    );
    info!("  Metrics: {}", serde_json::to_string(&summary)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["collision_prediction", "frames.jsonl"]).unwrap();
        assert_eq!(args.input, PathBuf::from("frames.jsonl"));
        assert_eq!(args.config, PathBuf::from("config.yaml"));
        assert!(args.report.is_none());
    }

    #[test]
    fn test_args_named_flags() {
        let args = Args::try_parse_from([
            "collision_prediction",
            "frames.jsonl",
            "--report",
            "out.jsonl",
            "--config",
            "alt.yaml",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("alt.yaml"));
        assert_eq!(args.report, Some(PathBuf::from("out.jsonl")));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["collision_prediction"]).is_err());
    }
}
