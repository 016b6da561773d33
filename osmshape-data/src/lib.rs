//! Reading OSM XML documents and writing shaped relations.
//!
//! Responsibilities:
//! - Stream top-level elements out of (optionally bzip2-compressed) OSM XML.
//! - Drive elements through shaping and validation into a sink.
//! - Provide CSV, SQLite and in-memory sinks.
//! - Profile documents for element, key and contributor statistics.
//!
//! Boundaries:
//! - Do not encode shaping or schema rules (live in `osmshape-core`).
//! - Single-threaded and blocking; callers own any parallelism.
//!
//! Invariants:
//! - Memory stays bounded by the largest single top-level element.
//! - Sinks receive bundles in document order and are always finished.
#![forbid(unsafe_code)]

pub mod pipeline;
pub mod profile;
pub mod reader;
pub mod sink;

#[cfg(test)]
mod test_support;

pub use pipeline::{
    ConversionReport, ConvertError, ConvertOptions, Quarantined, ValidationMode, convert,
};
pub use profile::{DocumentProfile, KeyCategoryCounts, profile_document};
pub use reader::{
    ElementFilter, ElementReader, FileElementReader, ReadError, is_bz2, open_document,
};
#[cfg(feature = "store-sqlite")]
pub use sink::{DATABASE_FILE_NAME, SqliteSink};
pub use sink::{CsvSink, MemorySink, RelationOutputs, RelationSink, SinkError, file_name};
