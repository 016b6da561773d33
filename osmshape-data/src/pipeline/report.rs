use geo::{Coord, Rect};
use log::info;
use osmshape_core::{Bundle, Element, ElementKind, ElementRef};

/// An element left out of the outputs because it failed shaping or
/// validation while running in quarantine mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quarantined {
    /// The offending element.
    pub element: ElementRef,
    /// Human-readable reason, taken from the underlying error.
    pub reason: String,
}

/// Counts gathered while converting a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionReport {
    /// Node rows written.
    pub nodes: u64,
    /// Node tag rows written.
    pub node_tags: u64,
    /// Way rows written.
    pub ways: u64,
    /// Way tag rows written.
    pub way_tags: u64,
    /// Way node rows written.
    pub way_nodes: u64,
    /// Relations read and passed over without output.
    pub relations: u64,
    /// Other top-level elements passed over, such as `bounds`.
    pub other_elements: u64,
    /// Tags dropped because their key contained problem characters, counted
    /// only on elements whose rows were written.
    pub dropped_tags: u64,
    /// Elements excluded in quarantine mode, in document order.
    pub quarantined: Vec<Quarantined>,
    /// Bounding box of every written node with in-range coordinates.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl ConversionReport {
    /// Total number of rows written across all relations.
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.nodes + self.node_tags + self.ways + self.way_tags + self.way_nodes
    }

    pub(super) fn record_bundle(&mut self, bundle: &Bundle) {
        match bundle {
            Bundle::Node(node) => {
                self.nodes += 1;
                self.node_tags += count(node.tags.len());
                if let Some(position) = wgs84_position(&node.node.lon, &node.node.lat) {
                    self.extend_bounds(position);
                }
            }
            Bundle::Way(way) => {
                self.ways += 1;
                self.way_tags += count(way.tags.len());
                self.way_nodes += count(way.way_nodes.len());
            }
        }
    }

    pub(super) fn record_passed_over(&mut self, element: &Element) {
        if element.kind() == Some(ElementKind::Relation) {
            self.relations += 1;
        } else {
            self.other_elements += 1;
        }
    }

    pub(super) fn quarantine(&mut self, element: ElementRef, reason: String) {
        self.quarantined.push(Quarantined { element, reason });
    }

    pub(super) fn log_summary(&self) {
        info!(
            "wrote {} nodes ({} tags), {} ways ({} tags, {} node refs); \
             passed over {} relations and {} other elements; \
             dropped {} tags; quarantined {} elements",
            self.nodes,
            self.node_tags,
            self.ways,
            self.way_tags,
            self.way_nodes,
            self.relations,
            self.other_elements,
            self.dropped_tags,
            self.quarantined.len()
        );
    }

    fn extend_bounds(&mut self, position: Coord<f64>) {
        let (low, high) = self
            .bounds
            .map_or((position, position), |rect| (rect.min(), rect.max()));
        self.bounds = Some(Rect::new(
            Coord {
                x: low.x.min(position.x),
                y: low.y.min(position.y),
            },
            Coord {
                x: high.x.max(position.x),
                y: high.y.max(position.y),
            },
        ));
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Parse a node's coordinates, keeping only finite values on the globe.
fn wgs84_position(lon: &str, lat: &str) -> Option<Coord<f64>> {
    let x = lon.parse::<f64>().ok()?;
    let y = lat.parse::<f64>().ok()?;
    let on_globe = (-180.0..=180.0).contains(&x) && (-90.0..=90.0).contains(&y);
    on_globe.then_some(Coord { x, y })
}
