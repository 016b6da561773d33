//! Field requiredness and type contract per output relation.

use std::collections::BTreeMap;
use std::fmt;

use crate::relation::Relation;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldType {
    /// Must parse as a signed 64-bit integer.
    Integer,
    /// Must parse as a 64-bit float.
    Float,
    /// Any text.
    String,
}

impl FieldType {
    /// Whether `value` can be coerced to this type.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Integer => value.parse::<i64>().is_ok(),
            Self::Float => value.parse::<f64>().is_ok(),
            Self::String => true,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
        })
    }
}

/// Contract for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldRule {
    /// Whether the record must carry the column.
    #[cfg_attr(feature = "serde", serde(default))]
    pub required: bool,
    /// Type the value must coerce to.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub field_type: FieldType,
}

impl FieldRule {
    /// A required column of the given type.
    #[must_use]
    pub const fn required(field_type: FieldType) -> Self {
        Self {
            required: true,
            field_type,
        }
    }
}

/// Column contracts for one relation, keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RelationSchema {
    fields: BTreeMap<String, FieldRule>,
}

impl RelationSchema {
    /// Build from `(column, rule)` pairs.
    pub fn from_rules<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldRule)>,
        S: Into<String>,
    {
        Self {
            fields: rules
                .into_iter()
                .map(|(name, rule)| (name.into(), rule))
                .collect(),
        }
    }

    /// Rule for a column, if declared.
    #[must_use]
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.fields.get(field)
    }

    /// Declared columns and their rules, ordered by name.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }
}

/// The validator's contract: which columns each relation must carry and
/// what type each must coerce to.
///
/// Relations missing from the schema are not checked.
///
/// # Examples
/// ```
/// use osmshape_core::{FieldType, Relation, Schema};
///
/// let schema = Schema::default();
/// let nodes = schema.relation(Relation::Nodes).expect("built-in nodes contract");
/// assert_eq!(nodes.rule("lat").map(|rule| rule.field_type), Some(FieldType::Float));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Schema {
    relations: BTreeMap<Relation, RelationSchema>,
}

impl Schema {
    /// A schema that checks nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            relations: BTreeMap::new(),
        }
    }

    /// Replace the contract of one relation.
    #[must_use]
    pub fn with_relation(mut self, relation: Relation, schema: RelationSchema) -> Self {
        self.relations.insert(relation, schema);
        self
    }

    /// Contract for `relation`, if declared.
    #[must_use]
    pub fn relation(&self, relation: Relation) -> Option<&RelationSchema> {
        self.relations.get(&relation)
    }

    /// Parse a schema from JSON.
    ///
    /// The document maps relation names to column maps, for example
    /// `{"nodes": {"id": {"required": true, "type": "integer"}}}`.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|source| SchemaError::Parse { source })
    }

    /// Parse a schema from a JSON reader.
    #[cfg(feature = "serde")]
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self, SchemaError> {
        serde_json::from_reader(reader).map_err(|source| SchemaError::Parse { source })
    }
}

impl Default for Schema {
    /// Every column of every relation is required. Ids, uids, changesets,
    /// node references and positions are integers, coordinates are floats and
    /// the rest is text.
    fn default() -> Self {
        Relation::ALL
            .into_iter()
            .fold(Self::empty(), |schema, relation| {
                let rules = relation
                    .fields()
                    .iter()
                    .map(|field| (*field, FieldRule::required(default_type(field))));
                schema.with_relation(relation, RelationSchema::from_rules(rules))
            })
    }
}

fn default_type(field: &str) -> FieldType {
    match field {
        "id" | "uid" | "changeset" | "node_id" | "position" => FieldType::Integer,
        "lat" | "lon" => FieldType::Float,
        _ => FieldType::String,
    }
}

/// Errors raised while loading a schema.
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The JSON did not describe a valid schema.
    #[error("failed to parse schema: {source}")]
    Parse {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
