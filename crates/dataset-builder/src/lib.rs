//! Multi-domain Dataset Assembly
//!
//! Loads per-split/per-domain/per-label metadata tables, validates them
//! against a declared schema, and joins each row with its waveform.

mod assembler;
mod error;
mod metadata;
mod schema;
mod types;

pub use assembler::{
    AssembledDataset, AssemblerConfig, AssemblyReport, ClassCount, DatasetAssembler, LoadFailure,
};
pub use error::DatasetError;
pub use metadata::MetadataSource;
pub use schema::{ColumnKind, ColumnSpec, MetadataSchema, ResolvedSchema};
pub use types::{DatasetRecord, Domain, Label, RowOrigin, SegmentMetadata, Split};
