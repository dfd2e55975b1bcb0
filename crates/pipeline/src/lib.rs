//! Motor Anomaly Feature Pipeline
//!
//! Metadata ingestion → waveform loading → feature extraction →
//! train/test feature tables.

pub mod config;
mod report;

pub use config::{ConfigError, PipelineConfig};
pub use report::PipelineReport;

use dataset_builder::{DatasetAssembler, DatasetError};
use feature_table::{FeatureTableBuilder, TableError};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Failed to write report {}: {reason}", path.display())]
    Report { path: PathBuf, reason: String },
}

/// Initialize logging
pub fn init_logging(level: &str, json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level: Level = level.parse()?;

    if json {
        let subscriber = FmtSubscriber::builder()
            .json()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

/// Size the global rayon pool. Zero keeps rayon's default.
pub fn configure_threads(threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    if threads == 0 {
        return Ok(());
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
}

/// Run the full pipeline and persist its outputs
pub fn run(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    info!(
        "Channel '{}' (column '{}'), output {}",
        config.channel.reference_column,
        config.channel.waveform_column,
        config.output_dir.display()
    );

    let assembler = DatasetAssembler::new(config.assembler_config(), config.metadata_schema());
    let dataset = assembler.assemble(&config.metadata_sources())?;

    let tables = FeatureTableBuilder::new().build(&dataset.records);

    let train_path = config.train_table_path();
    let test_path = config.test_table_path();
    tables.train.write_csv(&train_path)?;
    tables.test.write_csv(&test_path)?;

    let report = PipelineReport::new(dataset.report, &tables, train_path, test_path);
    write_report(&report, &config.report_path())?;

    info!(
        "Pipeline complete: {} train rows, {} test rows, {} skipped segments",
        report.train_rows,
        report.test_rows,
        report.failures.len()
    );
    Ok(report)
}

fn write_report(report: &PipelineReport, path: &std::path::Path) -> Result<(), PipelineError> {
    let err = |reason: String| PipelineError::Report {
        path: path.to_path_buf(),
        reason,
    };
    let json = serde_json::to_string_pretty(report).map_err(|e| err(e.to_string()))?;
    fs::write(path, json).map_err(|e| err(e.to_string()))
}
