//! Feature Table Builder

use crate::table::{FeatureRow, FeatureTables};
use dataset_builder::DatasetRecord;
use feature_engine::FeatureExtractor;
use rayon::prelude::*;
use tracing::{debug, info};

/// Maps dataset records to feature rows and partitions them by split
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureTableBuilder;

impl FeatureTableBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Extract the feature row of a single record
    pub fn row(extractor: &mut FeatureExtractor, record: &DatasetRecord) -> FeatureRow {
        let features = extractor.extract(&record.waveform);
        if features.is_undefined() {
            debug!(
                "Segment {} has a degenerate waveform ({} samples)",
                record.segment_id,
                record.waveform.len()
            );
        }
        FeatureRow {
            segment_id: record.segment_id.clone(),
            split: record.split,
            domain: record.domain,
            label: record.label,
            features,
        }
    }

    /// Build the train and test tables.
    ///
    /// Each worker owns one extractor; rows keep the order of `records`.
    pub fn build(&self, records: &[DatasetRecord]) -> FeatureTables {
        let rows: Vec<FeatureRow> = records
            .par_iter()
            .map_init(FeatureExtractor::new, |extractor, record| {
                Self::row(extractor, record)
            })
            .collect();

        let mut tables = FeatureTables::new();
        for row in rows {
            tables.insert(row);
        }

        info!(
            "Feature tables: {} train rows, {} test rows",
            tables.train.len(),
            tables.test.len()
        );
        tables
    }
}
