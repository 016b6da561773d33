//! Streaming reader for OSM XML documents.
//!
//! The reader walks the document with `quick-xml` and only materialises the
//! top-level elements selected by an [`ElementFilter`]. Each element is
//! yielded once its end tag has been seen, owning its whole subtree; nothing
//! is kept after it is handed over, so memory stays bounded by the largest
//! single element rather than by the document.

use std::collections::BTreeSet;
use std::io::{self, BufRead, BufReader, Read};

use bzip2::read::MultiBzDecoder;
use camino::{Utf8Path, Utf8PathBuf};
use osmshape_core::Element;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Errors raised while reading an OSM document.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The input file could not be opened.
    #[error("failed to open OSM document at {path:?}")]
    Open {
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The XML is malformed or the underlying stream failed.
    #[error("failed to parse OSM XML near byte {position}")]
    Parse {
        /// Byte offset reported by the parser.
        position: u64,
        /// Underlying parser error.
        #[source]
        source: quick_xml::Error,
    },
    /// An element or attribute name is not valid UTF-8.
    #[error("invalid UTF-8 in a name near byte {position}")]
    Encoding {
        /// Byte offset reported by the parser.
        position: u64,
        /// Underlying decoding error.
        #[source]
        source: std::str::Utf8Error,
    },
    /// The input ended while elements were still open.
    #[error("OSM document is truncated: {open} element(s) left open")]
    Truncated {
        /// Number of unclosed elements.
        open: usize,
    },
    /// The input contains no root element at all.
    #[error("OSM document has no root element")]
    MissingRoot,
}

/// Names of the top-level elements a reader yields.
///
/// The default selects `node` and `way`, the two kinds that are shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementFilter {
    names: Option<BTreeSet<String>>,
}

impl Default for ElementFilter {
    fn default() -> Self {
        Self::only(["node", "way"])
    }
}

impl ElementFilter {
    /// Yield only top-level elements with one of the given names.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Yield every top-level element.
    #[must_use]
    pub const fn all() -> Self {
        Self { names: None }
    }

    /// Also yield `relation` elements so callers can pass them through.
    #[must_use]
    pub fn with_relations(mut self) -> Self {
        if let Some(names) = self.names.as_mut() {
            names.insert("relation".to_owned());
        }
        self
    }

    /// Whether a top-level element called `name` is yielded.
    #[must_use]
    pub fn accepts(&self, name: &[u8]) -> bool {
        self.names.as_ref().is_none_or(|names| {
            std::str::from_utf8(name).is_ok_and(|decoded| names.contains(decoded))
        })
    }
}

/// Iterator over the selected top-level elements of an OSM document.
///
/// # Examples
/// ```
/// use osmshape_data::{ElementFilter, ElementReader};
///
/// let xml = r#"<osm><node id="1" lat="0" lon="0"/><relation id="9"/></osm>"#;
/// let reader = ElementReader::new(xml.as_bytes(), ElementFilter::default());
/// let names: Vec<String> = reader
///     .map(|element| element.map(|e| e.name().to_owned()))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(names, vec!["node"]);
/// # Ok::<(), osmshape_data::ReadError>(())
/// ```
pub struct ElementReader<R> {
    xml: quick_xml::Reader<R>,
    buf: Vec<u8>,
    filter: ElementFilter,
    depth: usize,
    open: Vec<Element>,
    root: Option<String>,
    finished: bool,
}

impl<R: BufRead> ElementReader<R> {
    /// Wrap a buffered byte source.
    pub fn new(source: R, filter: ElementFilter) -> Self {
        let mut xml = quick_xml::Reader::from_reader(source);
        xml.config_mut().trim_text(true);
        Self {
            xml,
            buf: Vec::new(),
            filter,
            depth: 0,
            open: Vec::new(),
            root: None,
            finished: false,
        }
    }

    /// Name of the document's root element, once it has been read.
    #[must_use]
    pub fn root_name(&self) -> Option<&str> {
        self.root.as_deref()
    }

    fn byte_position(&self) -> u64 {
        u64::try_from(self.xml.buffer_position()).unwrap_or(u64::MAX)
    }

    fn advance(&mut self) -> Result<Option<Element>, ReadError> {
        loop {
            self.buf.clear();
            let position = self.byte_position();
            let event = self
                .xml
                .read_event_into(&mut self.buf)
                .map_err(|source| ReadError::Parse { position, source })?;
            match event {
                Event::Start(start) => {
                    self.depth += 1;
                    if self.depth == 1 {
                        self.root = Some(owned_name(&start, position)?);
                    } else if !self.open.is_empty()
                        || (self.depth == 2 && self.filter.accepts(start.name().as_ref()))
                    {
                        self.open.push(to_element(&start, position)?);
                    }
                }
                Event::Empty(start) => {
                    if self.depth == 0 {
                        self.root = Some(owned_name(&start, position)?);
                    } else if let Some(parent) = self.open.last_mut() {
                        parent.push_child(to_element(&start, position)?);
                    } else if self.depth == 1 && self.filter.accepts(start.name().as_ref()) {
                        return to_element(&start, position).map(Some);
                    }
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    if let Some(closed) = self.open.pop() {
                        match self.open.last_mut() {
                            Some(parent) => parent.push_child(closed),
                            None => return Ok(Some(closed)),
                        }
                    }
                }
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(ReadError::Truncated { open: self.depth });
                    }
                    if self.root.is_none() {
                        return Err(ReadError::MissingRoot);
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for ElementReader<R> {
    type Item = Result<Element, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                self.open.clear();
                Some(Err(err))
            }
        }
    }
}

/// Reader over a file opened by [`open_document`].
pub type FileElementReader = ElementReader<Box<dyn BufRead + Send>>;

/// Open an OSM XML file, decompressing `.bz2` inputs on the fly.
pub fn open_document(
    path: &Utf8Path,
    filter: ElementFilter,
) -> Result<FileElementReader, ReadError> {
    let file = osmshape_fs::open_utf8_file(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Box<dyn Read + Send> = if is_bz2(path) {
        Box::new(MultiBzDecoder::new(file.into_std()))
    } else {
        Box::new(file.into_std())
    };
    let buffered: Box<dyn BufRead + Send> = Box::new(BufReader::new(raw));
    Ok(ElementReader::new(buffered, filter))
}

/// Whether the path names a bzip2-compressed file.
#[must_use]
pub fn is_bz2(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("bz2"))
}

fn decode_name(raw: &[u8], position: u64) -> Result<&str, ReadError> {
    std::str::from_utf8(raw).map_err(|source| ReadError::Encoding { position, source })
}

fn owned_name(start: &BytesStart<'_>, position: u64) -> Result<String, ReadError> {
    decode_name(start.name().as_ref(), position).map(str::to_owned)
}

fn to_element(start: &BytesStart<'_>, position: u64) -> Result<Element, ReadError> {
    let mut element = Element::new(decode_name(start.name().as_ref(), position)?);
    for entry in start.attributes() {
        let attribute = entry.map_err(|source| ReadError::Parse {
            position,
            source: source.into(),
        })?;
        let key = decode_name(attribute.key.as_ref(), position)?;
        let value = attribute
            .unescape_value()
            .map_err(|source| ReadError::Parse { position, source })?;
        element.push_attribute(key, value.into_owned());
    }
    Ok(element)
}
