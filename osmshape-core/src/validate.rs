//! Schema gate between the shaper and the sinks.

use thiserror::Error;

use crate::record::Bundle;
use crate::relation::{Relation, Row};
use crate::schema::{FieldType, Schema};

/// A record in a bundle did not satisfy the schema.
///
/// `row` is the index within the bundle's tag or way-node list, and `None`
/// for the bundle's single node or way record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required column is absent from the record.
    #[error("{}: required field is missing", location(.relation, .row, .field))]
    MissingField {
        /// Relation of the failing record.
        relation: Relation,
        /// Position within the bundle's list, if any.
        row: Option<usize>,
        /// Column name.
        field: String,
    },
    /// A column value does not coerce to its declared type.
    #[error(
        "{}: expected {expected}, found {value:?}",
        location(.relation, .row, .field)
    )]
    InvalidType {
        /// Relation of the failing record.
        relation: Relation,
        /// Position within the bundle's list, if any.
        row: Option<usize>,
        /// Column name.
        field: String,
        /// Declared type.
        expected: FieldType,
        /// Offending value.
        value: String,
    },
}

impl ValidationError {
    /// Column that failed.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. } | Self::InvalidType { field, .. } => field,
        }
    }

    /// Relation of the failing record.
    #[must_use]
    pub const fn relation(&self) -> Relation {
        match self {
            Self::MissingField { relation, .. } | Self::InvalidType { relation, .. } => *relation,
        }
    }
}

fn location(relation: &Relation, row: &Option<usize>, field: &str) -> String {
    match row {
        Some(index) => format!("{relation}[{index}].{field}"),
        None => format!("{relation}.{field}"),
    }
}

/// Check every record of `bundle` against `schema`.
///
/// Stops at the first failure. Values are only checked for presence and
/// type coercibility; ranges are not inspected.
///
/// # Examples
/// ```
/// use osmshape_core::{Element, Schema, shape, validate};
///
/// let way = Element::new("way")
///     .with_attribute("id", "not-a-number")
///     .with_attribute("user", "u")
///     .with_attribute("uid", "1")
///     .with_attribute("version", "1")
///     .with_attribute("changeset", "1")
///     .with_attribute("timestamp", "2020-01-01T00:00:00Z");
/// let bundle = shape(&way)?.expect("ways are shaped");
///
/// let err = validate(&bundle, &Schema::default()).expect_err("id is not an integer");
/// assert_eq!(err.field(), "id");
/// # Ok::<(), osmshape_core::ShapeError>(())
/// ```
pub fn validate(bundle: &Bundle, schema: &Schema) -> Result<(), ValidationError> {
    match bundle {
        Bundle::Node(node) => {
            check_row(schema, Relation::Nodes, None, &node.node)?;
            check_rows(schema, Relation::NodeTags, &node.tags)
        }
        Bundle::Way(way) => {
            check_row(schema, Relation::Ways, None, &way.way)?;
            check_rows(schema, Relation::WayNodes, &way.way_nodes)?;
            check_rows(schema, Relation::WayTags, &way.tags)
        }
    }
}

fn check_rows<R: Row>(
    schema: &Schema,
    relation: Relation,
    rows: &[R],
) -> Result<(), ValidationError> {
    rows.iter()
        .enumerate()
        .try_for_each(|(index, row)| check_row(schema, relation, Some(index), row))
}

fn check_row<R: Row>(
    schema: &Schema,
    relation: Relation,
    row: Option<usize>,
    record: &R,
) -> Result<(), ValidationError> {
    let Some(contract) = schema.relation(relation) else {
        return Ok(());
    };
    for (field, rule) in contract.rules() {
        match record.field(field) {
            None if rule.required => {
                return Err(ValidationError::MissingField {
                    relation,
                    row,
                    field: field.to_owned(),
                });
            }
            None => {}
            Some(value) if !rule.field_type.accepts(&value) => {
                return Err(ValidationError::InvalidType {
                    relation,
                    row,
                    field: field.to_owned(),
                    expected: rule.field_type,
                    value: value.into_owned(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}
