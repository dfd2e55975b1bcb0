//! CSV Waveform Reader

use crate::error::LoadError;
use std::path::Path;

/// Read one numeric column from a headed CSV file. Empty cells read as NaN.
pub fn read_column(path: &Path, column: &str) -> Result<Vec<f64>, LoadError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| LoadError::unreadable(path, e))?;

    let idx = rdr
        .headers()
        .map_err(|e| LoadError::unreadable(path, e))?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })?;

    let mut samples = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| LoadError::unreadable(path, e))?;
        let cell = record.get(idx).unwrap_or("").trim();
        if cell.is_empty() {
            samples.push(f64::NAN);
            continue;
        }
        let value = cell.parse::<f64>().map_err(|e| LoadError::InvalidValue {
            path: path.to_path_buf(),
            row,
            reason: format!("'{}': {}", cell, e),
        })?;
        samples.push(value);
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_named_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seg.csv");
        std::fs::write(&path, "time,waveform\n0,1.5\n1,-2\n2,\n").unwrap();

        let samples = read_column(&path, "waveform").unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], 1.5);
        assert_eq!(samples[1], -2.0);
        assert!(samples[2].is_nan());
    }

    #[test]
    fn test_non_numeric_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seg.csv");
        std::fs::write(&path, "waveform\n1.0\nabc\n").unwrap();

        let err = read_column(&path, "waveform").unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seg.csv");
        std::fs::write(&path, "other\n1.0\n").unwrap();

        assert!(matches!(
            read_column(&path, "waveform"),
            Err(LoadError::MissingColumn { .. })
        ));
    }
}
