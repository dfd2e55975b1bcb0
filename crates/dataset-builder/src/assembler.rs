//! Dataset Assembler

use crate::error::DatasetError;
use crate::metadata::MetadataSource;
use crate::schema::MetadataSchema;
use crate::types::{DatasetRecord, Domain, Label, RowOrigin, SegmentMetadata, Split};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use signal_loader::{ChannelSpec, SignalLoader};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Assembler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Root that relative references of train rows resolve against
    pub train_root: PathBuf,
    /// Root that relative references of test rows resolve against
    pub test_root: PathBuf,
    /// Channel to load for every row
    pub channel: ChannelSpec,
}

impl AssemblerConfig {
    /// Split root for a row
    pub fn root(&self, split: Split) -> &Path {
        match split {
            Split::Train => &self.train_root,
            Split::Test => &self.test_root,
        }
    }
}

/// A metadata row whose waveform could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub segment_id: String,
    pub split: Split,
    pub origin: RowOrigin,
    /// Resolved waveform path, when the row had a reference
    pub path: Option<PathBuf>,
    pub reason: String,
}

/// Count of loaded records for one split/domain/label combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    pub split: Split,
    pub domain: Domain,
    pub label: Label,
    pub count: usize,
}

/// Outcome summary of an assembly run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyReport {
    /// Metadata rows across all tables
    pub metadata_rows: usize,
    /// Rows that produced a record
    pub loaded: usize,
    /// Rows that were skipped
    pub failures: Vec<LoadFailure>,
    /// Loaded records per split/domain/label
    pub class_counts: Vec<ClassCount>,
}

/// Assembled records plus the run report
#[derive(Debug, Clone)]
pub struct AssembledDataset {
    pub records: Vec<DatasetRecord>,
    pub report: AssemblyReport,
}

/// Joins metadata tables with their waveforms
pub struct DatasetAssembler {
    config: AssemblerConfig,
    schema: MetadataSchema,
    loader: SignalLoader,
}

impl DatasetAssembler {
    /// Create an assembler. The schema always declares the channel's reference column.
    pub fn new(config: AssemblerConfig, schema: MetadataSchema) -> Self {
        let schema = schema.with_reference(&config.channel.reference_column);
        let loader = SignalLoader::new(config.channel.clone());
        Self {
            config,
            schema,
            loader,
        }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Load and concatenate all metadata tables in source order
    pub fn load_metadata(&self, sources: &[MetadataSource]) -> Result<Vec<SegmentMetadata>, DatasetError> {
        if sources.is_empty() {
            return Err(DatasetError::NoMetadata);
        }

        let mut rows = Vec::new();
        for (table, source) in sources.iter().enumerate() {
            rows.extend(source.load(table, &self.schema)?);
        }

        info!("Metadata rows: {} from {} tables", rows.len(), sources.len());
        Ok(rows)
    }

    /// Load the waveform of one metadata row
    pub fn load_row(&self, meta: &SegmentMetadata) -> Result<DatasetRecord, LoadFailure> {
        let column = &self.config.channel.reference_column;
        let reference = meta.reference(column).ok_or_else(|| LoadFailure {
            segment_id: meta.segment_id.clone(),
            split: meta.split,
            origin: meta.origin,
            path: None,
            reason: format!("empty '{}' reference", column),
        })?;

        let waveform = self
            .loader
            .load(self.config.root(meta.split), reference)
            .map_err(|e| LoadFailure {
                segment_id: meta.segment_id.clone(),
                split: meta.split,
                origin: meta.origin,
                path: Some(e.path().clone()),
                reason: e.to_string(),
            })?;

        Ok(DatasetRecord {
            segment_id: meta.segment_id.clone(),
            split: meta.split,
            domain: meta.domain,
            label: meta.label,
            waveform,
            origin: meta.origin,
        })
    }

    /// Join already loaded metadata rows with their waveforms
    pub fn assemble_rows(&self, rows: &[SegmentMetadata]) -> Result<AssembledDataset, DatasetError> {
        // Indexed parallel collect keeps metadata order
        let outcomes: Vec<Result<DatasetRecord, LoadFailure>> =
            rows.par_iter().map(|meta| self.load_row(meta)).collect();

        let mut records = Vec::with_capacity(rows.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(record) => records.push(record),
                Err(failure) => {
                    warn!(
                        "Skipping segment {} ({}): {}",
                        failure.segment_id, failure.split, failure.reason
                    );
                    failures.push(failure);
                }
            }
        }

        if records.is_empty() {
            return Err(DatasetError::NoRecordsLoaded {
                attempted: rows.len(),
                failed: failures.len(),
            });
        }

        let report = AssemblyReport {
            metadata_rows: rows.len(),
            loaded: records.len(),
            failures,
            class_counts: class_counts(&records),
        };

        info!(
            "Assembled dataset: {} records, {} load failures",
            report.loaded,
            report.failures.len()
        );
        for c in &report.class_counts {
            info!("  {}/{}/label={}: {}", c.split, c.domain, c.label, c.count);
        }

        Ok(AssembledDataset { records, report })
    }

    /// Load all metadata tables and their waveforms
    pub fn assemble(&self, sources: &[MetadataSource]) -> Result<AssembledDataset, DatasetError> {
        let rows = self.load_metadata(sources)?;
        self.assemble_rows(&rows)
    }
}

fn class_counts(records: &[DatasetRecord]) -> Vec<ClassCount> {
    let mut counts: BTreeMap<(Split, Domain, Label), usize> = BTreeMap::new();
    for r in records {
        *counts.entry((r.split, r.domain, r.label)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((split, domain, label), count)| ClassCount {
            split,
            domain,
            label,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config(root: &Path) -> AssemblerConfig {
        AssemblerConfig {
            train_root: root.join("train"),
            test_root: root.join("test"),
            channel: ChannelSpec::new("imp23absu_mic", "waveform"),
        }
    }

    fn setup(root: &Path) -> Vec<MetadataSource> {
        fs::create_dir_all(root.join("train")).unwrap();
        fs::create_dir_all(root.join("test")).unwrap();
        fs::write(root.join("train/seg_a.csv"), "waveform\n1\n2\n3\n").unwrap();
        fs::write(root.join("test/seg_c.csv"), "waveform\n4\n5\n").unwrap();
        fs::write(
            root.join("train/meta.csv"),
            "segment_id,imp23absu_mic\na,seg_a.csv\nb,seg_b.csv\n",
        )
        .unwrap();
        fs::write(
            root.join("test/meta.csv"),
            "segment_id,imp23absu_mic\nc,seg_c.csv\nd,\n",
        )
        .unwrap();

        vec![
            MetadataSource::new(root.join("train/meta.csv"), Split::Train, Domain::Source, Label::Normal),
            MetadataSource::new(root.join("test/meta.csv"), Split::Test, Domain::Target, Label::Anomaly),
        ]
    }

    #[test]
    fn test_assemble_skips_failed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sources = setup(dir.path());
        let assembler = DatasetAssembler::new(config(dir.path()), MetadataSchema::default());

        let dataset = assembler.assemble(&sources).unwrap();

        let ids: Vec<&str> = dataset.records.iter().map(|r| r.segment_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(dataset.records[0].waveform, vec![1.0, 2.0, 3.0]);
        assert_eq!(dataset.records[1].split, Split::Test);
        assert_eq!(dataset.records[1].label, Label::Anomaly);
        assert_eq!(dataset.records[1].origin, RowOrigin { table: 1, row: 0 });

        let report = &dataset.report;
        assert_eq!(report.metadata_rows, 4);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].segment_id, "b");
        assert_eq!(report.failures[0].path, Some(dir.path().join("train/seg_b.csv")));
        assert_eq!(report.failures[1].segment_id, "d");
        assert!(report.failures[1].path.is_none());
        assert_eq!(report.class_counts.len(), 2);
    }

    #[test]
    fn test_short_metadata_row_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("train")).unwrap();
        fs::write(dir.path().join("train/seg_a.csv"), "waveform\n1\n2\n").unwrap();
        fs::write(
            dir.path().join("train/meta.csv"),
            "segment_id,imp23absu_mic\na,seg_a.csv\nb\n",
        )
        .unwrap();
        let sources = vec![MetadataSource::new(
            dir.path().join("train/meta.csv"),
            Split::Train,
            Domain::Source,
            Label::Normal,
        )];

        let assembler = DatasetAssembler::new(config(dir.path()), MetadataSchema::default());
        let dataset = assembler.assemble(&sources).unwrap();

        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].segment_id, "a");
        assert_eq!(dataset.report.metadata_rows, 2);
        assert_eq!(dataset.report.failures.len(), 1);
        assert_eq!(dataset.report.failures[0].segment_id, "b");
        assert!(dataset.report.failures[0].path.is_none());
    }

    #[test]
    fn test_no_sources_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DatasetAssembler::new(config(dir.path()), MetadataSchema::default());
        assert!(matches!(assembler.assemble(&[]), Err(DatasetError::NoMetadata)));
    }

    #[test]
    fn test_zero_loaded_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("meta.csv"), "segment_id,imp23absu_mic\n1,gone.parquet\n").unwrap();
        let sources = vec![MetadataSource::new(
            dir.path().join("meta.csv"),
            Split::Train,
            Domain::Source,
            Label::Normal,
        )];

        let assembler = DatasetAssembler::new(config(dir.path()), MetadataSchema::default());
        assert!(matches!(
            assembler.assemble(&sources),
            Err(DatasetError::NoRecordsLoaded { attempted: 1, failed: 1 })
        ));
    }

    #[test]
    fn test_schema_includes_channel_column() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("meta.csv"), "segment_id,imp23absu_mic\n1,seg.csv\n").unwrap();
        let sources = vec![MetadataSource::new(
            dir.path().join("meta.csv"),
            Split::Train,
            Domain::Source,
            Label::Normal,
        )];

        let mut cfg = config(dir.path());
        cfg.channel = ChannelSpec::new("ism330dhcx_gyro", "G_x");
        let assembler = DatasetAssembler::new(cfg, MetadataSchema::default());
        assert!(matches!(
            assembler.assemble(&sources),
            Err(DatasetError::SchemaMismatch { ref column, .. }) if column == "ism330dhcx_gyro"
        ));
    }
}
