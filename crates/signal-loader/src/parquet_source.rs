//! Parquet Waveform Reader

use crate::error::LoadError;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use parquet::schema::types::Type;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Read one numeric column from a parquet file.
///
/// Only the requested column is decoded: the row iterator is driven by a
/// single-field projection of the file schema.
pub fn read_column(path: &Path, column: &str) -> Result<Vec<f64>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::unreadable(path, e))?;
    let reader = SerializedFileReader::new(file).map_err(|e| LoadError::unreadable(path, e))?;

    let metadata = reader.metadata();
    let expected_rows = metadata.file_metadata().num_rows().max(0) as usize;
    let field = metadata
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .find(|f| f.name() == column)
        .cloned()
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })?;

    let projection = Type::group_type_builder("schema")
        .with_fields(vec![field])
        .build()
        .map_err(|e| LoadError::unreadable(path, e))?;

    let rows = reader
        .get_row_iter(Some(projection))
        .map_err(|e| LoadError::unreadable(path, e))?;

    let mut samples = Vec::with_capacity(expected_rows);
    for (row_idx, row) in rows.enumerate() {
        let row = row.map_err(|e| LoadError::unreadable(path, e))?;
        let (_, value) = row
            .get_column_iter()
            .next()
            .ok_or_else(|| LoadError::InvalidValue {
                path: path.to_path_buf(),
                row: row_idx,
                reason: "row has no value for projected column".to_string(),
            })?;
        samples.push(field_to_f64(value).ok_or_else(|| LoadError::InvalidValue {
            path: path.to_path_buf(),
            row: row_idx,
            reason: format!("non-numeric value {}", value),
        })?);
    }

    debug!("Read {} samples of '{}' from {}", samples.len(), column, path.display());
    Ok(samples)
}

/// Widen a numeric parquet cell to f64. Nulls map to NaN.
fn field_to_f64(field: &Field) -> Option<f64> {
    match *field {
        Field::Null => Some(f64::NAN),
        Field::Byte(v) => Some(v as f64),
        Field::Short(v) => Some(v as f64),
        Field::Int(v) => Some(v as f64),
        Field::Long(v) => Some(v as f64),
        Field::UByte(v) => Some(v as f64),
        Field::UShort(v) => Some(v as f64),
        Field::UInt(v) => Some(v as f64),
        Field::ULong(v) => Some(v as f64),
        Field::Float(v) => Some(v as f64),
        Field::Double(v) => Some(v),
        _ => None,
    }
}
