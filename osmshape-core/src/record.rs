//! Flat records produced by shaping one top-level element.
//!
//! Attribute values are the document's text, copied verbatim. Numeric
//! columns are checked against the schema by the validator rather than parsed
//! here, so an unvalidated run reproduces the input exactly.

use std::borrow::Cow;

use crate::element::{ElementKind, ElementRef};
use crate::relation::{Relation, Row};

/// A row of the `nodes` relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Node id.
    pub id: String,
    /// Latitude in WGS84 degrees.
    pub lat: String,
    /// Longitude in WGS84 degrees.
    pub lon: String,
    /// Display name of the last editor.
    pub user: String,
    /// Numeric id of the last editor.
    pub uid: String,
    /// Element version.
    pub version: String,
    /// Changeset that produced this version.
    pub changeset: String,
    /// ISO 8601 edit timestamp.
    pub timestamp: String,
}

/// A row of the `ways` relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WayRecord {
    /// Way id.
    pub id: String,
    /// Display name of the last editor.
    pub user: String,
    /// Numeric id of the last editor.
    pub uid: String,
    /// Element version.
    pub version: String,
    /// Changeset that produced this version.
    pub changeset: String,
    /// ISO 8601 edit timestamp.
    pub timestamp: String,
}

/// A row of `node_tags` or `way_tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    /// Id of the owning node or way.
    pub owner_id: String,
    /// Key with any namespace removed.
    pub key: String,
    /// Tag value.
    pub value: String,
    /// Namespace of the raw key, or `"regular"`.
    pub tag_type: String,
}

/// A row of `way_nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WayNodeRecord {
    /// Id of the owning way.
    pub way_id: String,
    /// Referenced node id.
    pub node_id: String,
    /// Zero-based position of the reference within the way.
    pub position: usize,
}

impl Row for NodeRecord {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => &self.id,
            "lat" => &self.lat,
            "lon" => &self.lon,
            "user" => &self.user,
            "uid" => &self.uid,
            "version" => &self.version,
            "changeset" => &self.changeset,
            "timestamp" => &self.timestamp,
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

impl Row for WayRecord {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => &self.id,
            "user" => &self.user,
            "uid" => &self.uid,
            "version" => &self.version,
            "changeset" => &self.changeset,
            "timestamp" => &self.timestamp,
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

impl Row for TagRecord {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => &self.owner_id,
            "key" => &self.key,
            "value" => &self.value,
            "type" => &self.tag_type,
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

impl Row for WayNodeRecord {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Borrowed(self.way_id.as_str())),
            "node_id" => Some(Cow::Borrowed(self.node_id.as_str())),
            "position" => Some(Cow::Owned(self.position.to_string())),
            _ => None,
        }
    }
}

/// Records shaped from a `<node>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeBundle {
    /// The node row.
    pub node: NodeRecord,
    /// Accepted tags in document order.
    pub tags: Vec<TagRecord>,
}

/// Records shaped from a `<way>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WayBundle {
    /// The way row.
    pub way: WayRecord,
    /// Accepted tags in document order.
    pub tags: Vec<TagRecord>,
    /// Node references with their positions.
    pub way_nodes: Vec<WayNodeRecord>,
}

/// Everything one shaped element contributes to the outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bundle {
    /// Shaped `<node>`.
    Node(NodeBundle),
    /// Shaped `<way>`.
    Way(WayBundle),
}

impl Bundle {
    /// Kind of the source element.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Node(_) => ElementKind::Node,
            Self::Way(_) => ElementKind::Way,
        }
    }

    /// Id of the source element.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Node(bundle) => &bundle.node.id,
            Self::Way(bundle) => &bundle.way.id,
        }
    }

    /// Reference to the source element for error reporting.
    #[must_use]
    pub fn element(&self) -> ElementRef {
        ElementRef::new(self.kind(), self.id())
    }

    /// Tags of the bundle, whichever kind it is.
    #[must_use]
    pub fn tags(&self) -> &[TagRecord] {
        match self {
            Self::Node(bundle) => &bundle.tags,
            Self::Way(bundle) => &bundle.tags,
        }
    }

    /// Relation that receives this bundle's tags.
    #[must_use]
    pub const fn tag_relation(&self) -> Relation {
        match self {
            Self::Node(_) => Relation::NodeTags,
            Self::Way(_) => Relation::WayTags,
        }
    }
}
