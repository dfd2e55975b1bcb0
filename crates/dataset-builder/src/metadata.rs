//! Metadata Table Loading

use crate::error::DatasetError;
use crate::schema::MetadataSchema;
use crate::types::{Domain, Label, RowOrigin, SegmentMetadata, Split};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A metadata CSV and the split/domain/label every row in it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSource {
    pub path: PathBuf,
    pub split: Split,
    pub domain: Domain,
    pub label: Label,
}

impl MetadataSource {
    pub fn new(path: impl Into<PathBuf>, split: Split, domain: Domain, label: Label) -> Self {
        Self {
            path: path.into(),
            split,
            domain,
            label,
        }
    }

    /// The six attribute tables of the BrushlessMotor layout.
    ///
    /// Train holds normal segments only; test holds both classes per domain.
    pub fn brushless_motor(train_root: &Path, test_root: &Path) -> Vec<Self> {
        vec![
            Self::new(
                train_root.join("attributes_normal_source_train.csv"),
                Split::Train,
                Domain::Source,
                Label::Normal,
            ),
            Self::new(
                train_root.join("attributes_normal_target_train.csv"),
                Split::Train,
                Domain::Target,
                Label::Normal,
            ),
            Self::new(
                test_root.join("attributes_normal_source_test.csv"),
                Split::Test,
                Domain::Source,
                Label::Normal,
            ),
            Self::new(
                test_root.join("attributes_anomaly_source_test.csv"),
                Split::Test,
                Domain::Source,
                Label::Anomaly,
            ),
            Self::new(
                test_root.join("attributes_normal_target_test.csv"),
                Split::Test,
                Domain::Target,
                Label::Normal,
            ),
            Self::new(
                test_root.join("attributes_anomaly_target_test.csv"),
                Split::Test,
                Domain::Target,
                Label::Anomaly,
            ),
        ]
    }

    /// Load every row of this table, stamped with the source's tags
    pub fn load(&self, table: usize, schema: &MetadataSchema) -> Result<Vec<SegmentMetadata>, DatasetError> {
        let unreadable = |e: csv::Error| DatasetError::MetadataUnreadable {
            path: self.path.clone(),
            reason: e.to_string(),
        };

        // Short rows are per-row problems: their missing cells read as empty
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(unreadable)?;
        let headers = rdr.headers().map_err(unreadable)?.clone();
        let resolved = schema.resolve(&self.path, &headers)?;

        let mut rows = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(unreadable)?;
            let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

            let references: BTreeMap<String, String> = resolved
                .references
                .iter()
                .map(|(name, idx)| (name.clone(), cell(*idx)))
                .collect();

            rows.push(SegmentMetadata {
                segment_id: cell(resolved.segment_id),
                split: self.split,
                domain: self.domain,
                label: self.label,
                references,
                origin: RowOrigin { table, row },
            });
        }

        debug!(
            "Loaded {} metadata rows from {} ({}/{}/{})",
            rows.len(),
            self.path.display(),
            self.split,
            self.domain,
            self.label
        );
        Ok(rows)
    }
}
