//! Metadata Table Schema

use crate::error::DatasetError;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Semantic type of a declared metadata column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Unique segment identifier
    SegmentId,
    /// Relative or absolute path to a channel's waveform file
    SignalReference,
}

/// A declared metadata column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// Declared columns of a metadata table, checked against the CSV header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSchema {
    pub columns: Vec<ColumnSpec>,
}

/// Header positions of the declared columns
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    pub segment_id: usize,
    /// (column name, header index) for each reference column
    pub references: Vec<(String, usize)>,
}

impl Default for MetadataSchema {
    fn default() -> Self {
        Self::new("segment_id", ["imp23absu_mic"])
    }
}

impl MetadataSchema {
    /// Schema with one id column and the given reference columns
    pub fn new<I, S>(segment_id: &str, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = vec![ColumnSpec {
            name: segment_id.to_string(),
            kind: ColumnKind::SegmentId,
        }];
        columns.extend(references.into_iter().map(|name| ColumnSpec {
            name: name.into(),
            kind: ColumnKind::SignalReference,
        }));
        Self { columns }
    }

    /// Add a reference column if not already declared
    pub fn with_reference(mut self, name: &str) -> Self {
        if !self.columns.iter().any(|c| c.name == name) {
            self.columns.push(ColumnSpec {
                name: name.to_string(),
                kind: ColumnKind::SignalReference,
            });
        }
        self
    }

    /// Validate a header row and resolve column positions.
    ///
    /// Fails on the first declared column the header lacks.
    pub fn resolve(&self, path: &Path, headers: &StringRecord) -> Result<ResolvedSchema, DatasetError> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DatasetError::SchemaMismatch {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        let mut segment_id = None;
        let mut references = Vec::new();
        for column in &self.columns {
            let idx = position(&column.name)?;
            match column.kind {
                ColumnKind::SegmentId => segment_id = Some(idx),
                ColumnKind::SignalReference => references.push((column.name.clone(), idx)),
            }
        }

        let segment_id = segment_id.ok_or_else(|| DatasetError::SchemaMismatch {
            path: path.to_path_buf(),
            column: "<segment id column not declared>".to_string(),
        })?;

        Ok(ResolvedSchema {
            segment_id,
            references,
        })
    }
}
