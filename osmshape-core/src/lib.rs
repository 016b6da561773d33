//! Core domain types for turning OSM elements into relational rows.
//!
//! Responsibilities:
//! - Model the element tree handed over by the reader.
//! - Classify tag keys and shape node/way elements into record bundles.
//! - Declare the schema contract and validate bundles against it.
//!
//! Boundaries:
//! - No I/O. Reading documents and writing relations live in `osmshape-data`.
//!
//! Invariants:
//! - Shaping is deterministic and never mutates its input.
//! - No global mutable state.
#![forbid(unsafe_code)]

pub mod classify;
pub mod element;
pub mod record;
pub mod relation;
pub mod schema;
pub mod shape;
pub mod validate;

pub use classify::{DEFAULT_TAG_TYPE, KeyCategory, TagKey, classify};
pub use element::{Element, ElementKind, ElementRef};
pub use record::{Bundle, NodeBundle, NodeRecord, TagRecord, WayBundle, WayNodeRecord, WayRecord};
pub use relation::{Relation, Row};
#[cfg(feature = "serde")]
pub use schema::SchemaError;
pub use schema::{FieldRule, FieldType, RelationSchema, Schema};
pub use shape::{ShapeError, Shaper, shape};
pub use validate::{ValidationError, validate};
