//! Feature Tables and CSV Persistence

use crate::error::TableError;
use dataset_builder::{Domain, Label, Split};
use feature_engine::{FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
use std::fs;
use std::path::Path;
use tracing::info;

/// Bookkeeping columns preceding the features
const KEY_COLUMNS: [&str; 4] = ["segment_id", "split", "domain", "label"];

/// Column order of every persisted feature table
pub const TABLE_COLUMNS: [&str; KEY_COLUMNS.len() + FEATURE_DIMENSION] = table_columns();

const fn table_columns() -> [&'static str; KEY_COLUMNS.len() + FEATURE_DIMENSION] {
    let mut columns = [""; KEY_COLUMNS.len() + FEATURE_DIMENSION];
    let mut i = 0;
    while i < KEY_COLUMNS.len() {
        columns[i] = KEY_COLUMNS[i];
        i += 1;
    }
    let mut j = 0;
    while j < FEATURE_DIMENSION {
        columns[KEY_COLUMNS.len() + j] = FEATURE_NAMES[j];
        j += 1;
    }
    columns
}

/// Feature vector of one segment with its bookkeeping fields
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub segment_id: String,
    pub split: Split,
    pub domain: Domain,
    pub label: Label,
    pub features: FeatureVector,
}

impl FeatureRow {
    /// Cells in [`TABLE_COLUMNS`] order
    fn to_cells(&self) -> Vec<String> {
        let f = &self.features;
        vec![
            self.segment_id.clone(),
            self.split.to_string(),
            self.domain.to_string(),
            self.label.to_string(),
            format_float(f.mean),
            format_float(f.std),
            format_float(f.skew),
            format_float(f.kurtosis),
            format_float(f.max),
            format_float(f.min),
            format_index(f.freq_peak),
            format_float(f.signal_energy),
        ]
    }
}

/// Undefined values are written as empty cells. `Debug` switches to
/// exponent form for very small and very large magnitudes.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:?}", value)
    }
}

fn format_index(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{}", value as u64)
    }
}

fn parse_float(cell: &str) -> Result<f64, String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|e| format!("'{}': {}", cell, e))
}

/// Feature rows of one split
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    split: Split,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Empty table for a split
    pub fn new(split: Split) -> Self {
        Self {
            split,
            rows: Vec::new(),
        }
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. Rows of another split are rejected.
    pub fn push(&mut self, row: FeatureRow) -> Result<(), FeatureRow> {
        if row.split != self.split {
            return Err(row);
        }
        self.rows.push(row);
        Ok(())
    }

    /// Write the table as CSV, header first. Parent directories are created.
    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TableError::Io {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let mut wtr = csv::Writer::from_path(path).map_err(|e| TableError::csv(path, e))?;
        wtr.write_record(TABLE_COLUMNS)
            .map_err(|e| TableError::csv(path, e))?;
        for row in &self.rows {
            wtr.write_record(row.to_cells())
                .map_err(|e| TableError::csv(path, e))?;
        }
        wtr.flush().map_err(|e| TableError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!(
            "Wrote {} {} rows to {}",
            self.rows.len(),
            self.split,
            path.display()
        );
        Ok(())
    }

    /// Read a table written by [`FeatureTable::write_csv`]
    pub fn read_csv(path: &Path, split: Split) -> Result<Self, TableError> {
        let mut rdr = csv::Reader::from_path(path).map_err(|e| TableError::csv(path, e))?;

        let headers = rdr.headers().map_err(|e| TableError::csv(path, e))?.clone();
        if !headers.iter().eq(TABLE_COLUMNS.iter().copied()) {
            return Err(TableError::HeaderMismatch {
                path: path.to_path_buf(),
                expected: TABLE_COLUMNS.join(","),
                found: headers.iter().collect::<Vec<_>>().join(","),
            });
        }

        let mut table = Self::new(split);
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| TableError::csv(path, e))?;
            let cell = |col: usize| record.get(col).unwrap_or("");
            let invalid = |col: usize, reason: String| TableError::InvalidCell {
                path: path.to_path_buf(),
                row,
                column: TABLE_COLUMNS[col],
                reason,
            };
            let float = |col: usize| parse_float(cell(col)).map_err(|reason| invalid(col, reason));

            let row_split: Split = cell(1).parse().map_err(|reason| invalid(1, reason))?;
            if row_split != split {
                return Err(TableError::SplitMismatch {
                    path: path.to_path_buf(),
                    row,
                    expected: split.to_string(),
                    found: row_split.to_string(),
                });
            }

            table.rows.push(FeatureRow {
                segment_id: cell(0).to_string(),
                split: row_split,
                domain: cell(2).parse().map_err(|reason| invalid(2, reason))?,
                label: cell(3).parse().map_err(|reason| invalid(3, reason))?,
                features: FeatureVector {
                    mean: float(4)?,
                    std: float(5)?,
                    skew: float(6)?,
                    kurtosis: float(7)?,
                    max: float(8)?,
                    min: float(9)?,
                    freq_peak: float(10)?,
                    signal_energy: float(11)?,
                },
            });
        }

        Ok(table)
    }
}

/// Train and test tables produced from one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTables {
    pub train: FeatureTable,
    pub test: FeatureTable,
}

impl FeatureTables {
    pub fn new() -> Self {
        Self {
            train: FeatureTable::new(Split::Train),
            test: FeatureTable::new(Split::Test),
        }
    }

    /// Table for a split
    pub fn get(&self, split: Split) -> &FeatureTable {
        match split {
            Split::Train => &self.train,
            Split::Test => &self.test,
        }
    }

    /// Route a row to the table of its split
    pub fn insert(&mut self, row: FeatureRow) {
        let table = match row.split {
            Split::Train => &mut self.train,
            Split::Test => &mut self.test,
        };
        table.rows.push(row);
    }

    /// Rows across both tables
    pub fn total_rows(&self) -> usize {
        self.train.len() + self.test.len()
    }
}

impl Default for FeatureTables {
    fn default() -> Self {
        Self::new()
    }
}
