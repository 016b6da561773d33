//! Decompose one top-level element into flat relational records.
//!
//! Only direct `tag` and `nd` children of the element are considered. The
//! reader hands over one closed element per call, so a way never sees a
//! sibling's children.

use log::debug;
use thiserror::Error;

use crate::classify::{TagKey, classify};
use crate::element::{Element, ElementKind, ElementRef};
use crate::record::{
    Bundle, NodeBundle, NodeRecord, TagRecord, WayBundle, WayNodeRecord, WayRecord,
};

/// Errors raised while shaping an element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// A required attribute of the top-level element is absent.
    #[error("{element} is missing required attribute `{attribute}`")]
    MissingAttribute {
        /// Element that failed to shape.
        element: ElementRef,
        /// Name of the absent attribute.
        attribute: &'static str,
    },
    /// A `tag` or `nd` child lacks one of its attributes.
    #[error("{element} has a `{child}` child without `{attribute}`")]
    MissingChildAttribute {
        /// Element that failed to shape.
        element: ElementRef,
        /// Child element name (`tag` or `nd`).
        child: &'static str,
        /// Name of the absent attribute.
        attribute: &'static str,
    },
}

impl ShapeError {
    /// Element that caused the error.
    #[must_use]
    pub const fn element(&self) -> &ElementRef {
        match self {
            Self::MissingAttribute { element, .. }
            | Self::MissingChildAttribute { element, .. } => element,
        }
    }
}

/// Shapes elements and keeps a running count of dropped tags.
///
/// A single `Shaper` is meant to live for one conversion run; the counter is
/// the only state it carries and it never affects what a bundle contains.
#[derive(Debug, Default, Clone)]
pub struct Shaper {
    dropped_tags: u64,
}

impl Shaper {
    /// Create a shaper with a zeroed drop counter.
    #[must_use]
    pub const fn new() -> Self {
        Self { dropped_tags: 0 }
    }

    /// Number of tags rejected by the key classifier so far.
    #[must_use]
    pub const fn dropped_tags(&self) -> u64 {
        self.dropped_tags
    }

    /// Shape `element` into a bundle.
    ///
    /// Returns `Ok(None)` for anything other than `node` and `way`.
    ///
    /// # Examples
    /// ```
    /// use osmshape_core::{Bundle, Element, Shaper};
    ///
    /// let node = Element::new("node")
    ///     .with_attribute("id", "12345")
    ///     .with_attribute("lat", "33.45")
    ///     .with_attribute("lon", "-112.07")
    ///     .with_attribute("user", "mapper")
    ///     .with_attribute("uid", "42")
    ///     .with_attribute("version", "3")
    ///     .with_attribute("changeset", "9000")
    ///     .with_attribute("timestamp", "2016-01-01T00:00:00Z")
    ///     .with_child(
    ///         Element::new("tag")
    ///             .with_attribute("k", "addr:street:name")
    ///             .with_attribute("v", "Lincoln"),
    ///     );
    ///
    /// let mut shaper = Shaper::new();
    /// let Some(Bundle::Node(bundle)) = shaper.shape(&node)? else {
    ///     panic!("expected a node bundle");
    /// };
    /// assert_eq!(bundle.tags[0].tag_type, "addr");
    /// assert_eq!(bundle.tags[0].key, "street:name");
    /// # Ok::<(), osmshape_core::ShapeError>(())
    /// ```
    pub fn shape(&mut self, element: &Element) -> Result<Option<Bundle>, ShapeError> {
        match element.kind() {
            Some(ElementKind::Node) => self.shape_node(element).map(Bundle::Node).map(Some),
            Some(ElementKind::Way) => self.shape_way(element).map(Bundle::Way).map(Some),
            Some(ElementKind::Relation) | None => Ok(None),
        }
    }

    fn shape_node(&mut self, element: &Element) -> Result<NodeBundle, ShapeError> {
        let attrs = Attributes::new(element, ElementKind::Node);
        let node = NodeRecord {
            id: attrs.required("id")?,
            lat: attrs.required("lat")?,
            lon: attrs.required("lon")?,
            user: attrs.required("user")?,
            uid: attrs.required("uid")?,
            version: attrs.required("version")?,
            changeset: attrs.required("changeset")?,
            timestamp: attrs.required("timestamp")?,
        };
        let tags = self.shape_tags(element, &attrs, &node.id)?;
        Ok(NodeBundle { node, tags })
    }

    fn shape_way(&mut self, element: &Element) -> Result<WayBundle, ShapeError> {
        let attrs = Attributes::new(element, ElementKind::Way);
        let way = WayRecord {
            id: attrs.required("id")?,
            user: attrs.required("user")?,
            uid: attrs.required("uid")?,
            version: attrs.required("version")?,
            changeset: attrs.required("changeset")?,
            timestamp: attrs.required("timestamp")?,
        };
        let way_nodes = element
            .children_named("nd")
            .enumerate()
            .map(|(position, nd)| {
                Ok(WayNodeRecord {
                    way_id: way.id.clone(),
                    node_id: attrs.child_attribute(nd, "nd", "ref")?.to_owned(),
                    position,
                })
            })
            .collect::<Result<Vec<_>, ShapeError>>()?;
        let tags = self.shape_tags(element, &attrs, &way.id)?;
        Ok(WayBundle {
            way,
            tags,
            way_nodes,
        })
    }

    fn shape_tags(
        &mut self,
        element: &Element,
        attrs: &Attributes<'_>,
        owner_id: &str,
    ) -> Result<Vec<TagRecord>, ShapeError> {
        let mut tags = Vec::new();
        for tag in element.children_named("tag") {
            let raw_key = attrs.child_attribute(tag, "tag", "k")?;
            let value = attrs.child_attribute(tag, "tag", "v")?;
            match classify(raw_key) {
                TagKey::Accepted { tag_type, key } => tags.push(TagRecord {
                    owner_id: owner_id.to_owned(),
                    key: key.to_owned(),
                    value: value.to_owned(),
                    tag_type: tag_type.to_owned(),
                }),
                TagKey::Rejected => {
                    self.dropped_tags += 1;
                    debug!("dropped tag {raw_key:?} on {}", attrs.reference());
                }
            }
        }
        Ok(tags)
    }
}

/// Shape a single element with a throwaway [`Shaper`].
pub fn shape(element: &Element) -> Result<Option<Bundle>, ShapeError> {
    Shaper::new().shape(element)
}

struct Attributes<'e> {
    element: &'e Element,
    kind: ElementKind,
}

impl<'e> Attributes<'e> {
    const fn new(element: &'e Element, kind: ElementKind) -> Self {
        Self { element, kind }
    }

    fn reference(&self) -> ElementRef {
        ElementRef::of(self.kind, self.element)
    }

    fn required(&self, attribute: &'static str) -> Result<String, ShapeError> {
        self.element
            .attribute(attribute)
            .map(str::to_owned)
            .ok_or_else(|| ShapeError::MissingAttribute {
                element: self.reference(),
                attribute,
            })
    }

    fn child_attribute<'c>(
        &self,
        child: &'c Element,
        child_name: &'static str,
        attribute: &'static str,
    ) -> Result<&'c str, ShapeError> {
        child
            .attribute(attribute)
            .ok_or_else(|| ShapeError::MissingChildAttribute {
                element: self.reference(),
                child: child_name,
                attribute,
            })
    }
}

#[cfg(test)]
mod tests;
