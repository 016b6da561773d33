//! Facade crate for the osmshape OSM XML conversion pipeline.
//!
//! This crate re-exports the element model, shaping and validation types, and
//! exposes the streaming reader, sinks and pipeline behind feature flags.

#![forbid(unsafe_code)]

pub use osmshape_core::{
    Bundle, DEFAULT_TAG_TYPE, Element, ElementKind, ElementRef, FieldRule, FieldType, KeyCategory,
    NodeBundle, NodeRecord, Relation, RelationSchema, Row, Schema, ShapeError, Shaper, TagKey,
    TagRecord, ValidationError, WayBundle, WayNodeRecord, WayRecord, classify, shape, validate,
};

#[cfg(feature = "serde")]
pub use osmshape_core::SchemaError;

#[cfg(feature = "data")]
pub use osmshape_data::{
    ConversionReport, ConvertError, ConvertOptions, CsvSink, DocumentProfile, ElementFilter,
    ElementReader, FileElementReader, KeyCategoryCounts, MemorySink, Quarantined, ReadError,
    RelationOutputs, RelationSink, SinkError, ValidationMode, convert, file_name, is_bz2,
    open_document, profile_document,
};

#[cfg(feature = "store-sqlite")]
pub use osmshape_data::{DATABASE_FILE_NAME, SqliteSink};
