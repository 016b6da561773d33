//! Exploratory statistics over a whole document.

use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

use osmshape_core::{Element, KeyCategory};
use serde::Serialize;

use crate::reader::{ElementReader, ReadError};

/// How many tag keys fell into each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct KeyCategoryCounts {
    /// Keys made of lowercase letters and underscores.
    pub lower: u64,
    /// Two such words joined by one colon.
    pub lower_colon: u64,
    /// Keys containing a problem character.
    pub problemchars: u64,
    /// Everything else.
    pub other: u64,
}

impl KeyCategoryCounts {
    fn record(&mut self, category: KeyCategory) {
        let slot = match category {
            KeyCategory::Lower => &mut self.lower,
            KeyCategory::LowerColon => &mut self.lower_colon,
            KeyCategory::ProblemChars => &mut self.problemchars,
            KeyCategory::Other => &mut self.other,
        };
        *slot += 1;
    }
}

/// Element, tag key and contributor statistics for one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DocumentProfile {
    /// Occurrences of every element name at any depth, including the root.
    pub element_counts: BTreeMap<String, u64>,
    /// Categories of every `tag` key.
    pub key_categories: KeyCategoryCounts,
    /// Distinct `uid` values found on nodes, ways and relations.
    pub contributors: BTreeSet<String>,
}

impl DocumentProfile {
    /// Add one top-level element and its subtree to the profile.
    pub fn record(&mut self, element: &Element) {
        element.visit(&mut |visited: &Element| self.record_one(visited));
    }

    /// Number of distinct contributors.
    #[must_use]
    pub fn unique_contributors(&self) -> usize {
        self.contributors.len()
    }

    fn record_name(&mut self, name: &str) {
        *self.element_counts.entry(name.to_owned()).or_default() += 1;
    }

    fn record_one(&mut self, element: &Element) {
        self.record_name(element.name());
        if element.name() == "tag"
            && let Some(key) = element.attribute("k")
        {
            self.key_categories.record(KeyCategory::of(key));
        }
        if element.kind().is_some()
            && let Some(uid) = element.attribute("uid")
        {
            self.contributors.insert(uid.to_owned());
        }
    }
}

/// Read a whole document and profile every element in it.
///
/// The reader should use [`crate::ElementFilter::all`] so that every
/// top-level element is seen; elements it filters out are not counted.
///
/// # Examples
/// ```
/// use osmshape_data::{ElementFilter, ElementReader, profile_document};
///
/// let xml = r#"<osm><node id="1" uid="7"><tag k="name" v="x"/></node></osm>"#;
/// let profile = profile_document(ElementReader::new(xml.as_bytes(), ElementFilter::all()))?;
/// assert_eq!(profile.element_counts.get("tag"), Some(&1));
/// assert_eq!(profile.unique_contributors(), 1);
/// # Ok::<(), osmshape_data::ReadError>(())
/// ```
pub fn profile_document<R: BufRead>(
    mut reader: ElementReader<R>,
) -> Result<DocumentProfile, ReadError> {
    let mut profile = DocumentProfile::default();
    for item in reader.by_ref() {
        profile.record(&item?);
    }
    if let Some(root) = reader.root_name() {
        profile.record_name(root);
    }
    Ok(profile)
}
