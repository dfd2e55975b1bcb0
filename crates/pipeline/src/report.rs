//! Run report

use dataset_builder::{AssemblyReport, ClassCount, LoadFailure};
use feature_table::FeatureTables;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of one pipeline run, persisted next to the feature tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub metadata_rows: usize,
    pub loaded: usize,
    pub failures: Vec<LoadFailure>,
    pub class_counts: Vec<ClassCount>,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Rows whose features are all undefined (empty or non-finite waveform)
    pub undefined_rows: usize,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
}

impl PipelineReport {
    pub fn new(
        assembly: AssemblyReport,
        tables: &FeatureTables,
        train_path: PathBuf,
        test_path: PathBuf,
    ) -> Self {
        let undefined_rows = tables
            .train
            .rows()
            .iter()
            .chain(tables.test.rows())
            .filter(|r| r.features.is_undefined())
            .count();

        Self {
            metadata_rows: assembly.metadata_rows,
            loaded: assembly.loaded,
            failures: assembly.failures,
            class_counts: assembly.class_counts,
            train_rows: tables.train.len(),
            test_rows: tables.test.len(),
            undefined_rows,
            train_path,
            test_path,
        }
    }
}
