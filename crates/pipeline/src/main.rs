//! Motor Anomaly Feature Pipeline - Main Entry Point

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use pipeline::{configure_threads, init_logging, run, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

/// Build train/test feature tables from motor sensor segment logs
#[derive(Parser, Debug)]
#[command(name = "motor-features")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for feature tables and the run report
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = PipelineConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    config.log_json |= args.log_json;

    init_logging(&config.log_level, config.log_json).map_err(|e| anyhow!("initializing logging: {}", e))?;
    configure_threads(config.threads).context("configuring worker threads")?;

    info!("=== Motor Feature Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let report = run(&config).context("feature pipeline failed")?;
    info!(
        "Wrote {} and {}",
        report.train_path.display(),
        report.test_path.display()
    );

    Ok(())
}
