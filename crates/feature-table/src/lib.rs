//! Feature Tables
//!
//! Applies the feature extractor to every dataset record and partitions the
//! rows into train/test tables with a shared, stable CSV schema.

mod builder;
mod error;
mod table;

pub use builder::FeatureTableBuilder;
pub use error::TableError;
pub use table::{FeatureRow, FeatureTable, FeatureTables, TABLE_COLUMNS};
