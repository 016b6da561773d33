//! The five output relations and their fixed column orders.

use std::{borrow::Cow, fmt};

/// One of the tabular outputs written by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Relation {
    /// One row per node.
    Nodes,
    /// Tags owned by nodes.
    NodeTags,
    /// One row per way.
    Ways,
    /// Tags owned by ways.
    WayTags,
    /// Ordered node references of each way.
    WayNodes,
}

const NODE_FIELDS: &[&str] = &[
    "id",
    "lat",
    "lon",
    "user",
    "uid",
    "version",
    "changeset",
    "timestamp",
];
const WAY_FIELDS: &[&str] = &["id", "user", "uid", "version", "changeset", "timestamp"];
const TAG_FIELDS: &[&str] = &["id", "key", "value", "type"];
const WAY_NODE_FIELDS: &[&str] = &["id", "node_id", "position"];

impl Relation {
    /// Every relation, in the order sinks open them.
    pub const ALL: [Self; 5] = [
        Self::Nodes,
        Self::NodeTags,
        Self::Ways,
        Self::WayTags,
        Self::WayNodes,
    ];

    /// Table name, also used as the output file stem.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::NodeTags => "node_tags",
            Self::Ways => "ways",
            Self::WayTags => "way_tags",
            Self::WayNodes => "way_nodes",
        }
    }

    /// Column names in output order.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Nodes => NODE_FIELDS,
            Self::Ways => WAY_FIELDS,
            Self::NodeTags | Self::WayTags => TAG_FIELDS,
            Self::WayNodes => WAY_NODE_FIELDS,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record that can be written as one row of a relation.
pub trait Row {
    /// Look up a column by name; `None` when the record has no such column.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Column values in the order given by `relation.fields()`.
    fn values(&self, relation: Relation) -> Vec<Cow<'_, str>> {
        relation
            .fields()
            .iter()
            .map(|name| self.field(name).unwrap_or_default())
            .collect()
    }
}
