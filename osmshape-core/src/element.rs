//! Owned element trees handed from the streaming reader to the shaper.

use std::fmt;

/// Kinds of top-level OSM elements the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ElementKind {
    /// A `<node>` carrying coordinates.
    Node,
    /// A `<way>` referencing an ordered list of nodes.
    Way,
    /// A `<relation>`; read but never shaped.
    Relation,
}

impl ElementKind {
    /// Map an XML element name onto a kind, if it is one of ours.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "node" => Some(Self::Node),
            "way" => Some(Self::Way),
            "relation" => Some(Self::Relation),
            _ => None,
        }
    }

    /// The XML element name for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a source element in errors and reports.
///
/// The id is kept as the raw attribute text; it is `None` when the element
/// had no `id` attribute at all.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElementRef {
    /// Kind of the element.
    pub kind: ElementKind,
    /// Raw `id` attribute, when present.
    pub id: Option<String>,
}

impl ElementRef {
    /// Build a reference from a kind and a known id.
    pub fn new(kind: ElementKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
        }
    }

    /// Build a reference to a parsed element of the given kind.
    #[must_use]
    pub fn of(kind: ElementKind, element: &Element) -> Self {
        Self {
            kind,
            id: element.attribute("id").map(str::to_owned),
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} {id}", self.kind),
            None => write!(f, "{} with missing id", self.kind),
        }
    }
}

/// A closed XML element together with its whole subtree.
///
/// Attributes keep document order; duplicate names are not merged, and
/// [`Element::attribute`] returns the first occurrence.
///
/// # Examples
/// ```
/// use osmshape_core::Element;
///
/// let way = Element::new("way")
///     .with_attribute("id", "7")
///     .with_child(Element::new("nd").with_attribute("ref", "1"));
///
/// assert_eq!(way.attribute("id"), Some("7"));
/// assert_eq!(way.children_named("nd").count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style variant of [`Element::push_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attribute(key, value);
        self
    }

    /// Builder-style variant of [`Element::push_child`].
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.push_child(child);
        self
    }

    /// Append an attribute.
    pub fn push_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Element name as written in the document.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the element, if it is a node, way or relation.
    #[must_use]
    pub fn kind(&self) -> Option<ElementKind> {
        ElementKind::from_name(&self.name)
    }

    /// Value of the first attribute called `key`.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Direct children in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Direct children with the given element name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Visit this element and every descendant, depth first in document order.
    pub fn visit<F>(&self, visitor: &mut F)
    where
        F: FnMut(&Self),
    {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }
}
