//! Sink that keeps every record in memory.

use osmshape_core::{Bundle, NodeRecord, TagRecord, WayNodeRecord, WayRecord};

use super::{RelationSink, SinkError};

/// Collects records in vectors, one per relation.
///
/// Useful for tests and for callers that post-process small extracts.
/// Writing after [`RelationSink::finish`] fails with [`SinkError::Finished`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    /// Rows of `nodes`.
    pub nodes: Vec<NodeRecord>,
    /// Rows of `node_tags`.
    pub node_tags: Vec<TagRecord>,
    /// Rows of `ways`.
    pub ways: Vec<WayRecord>,
    /// Rows of `way_tags`.
    pub way_tags: Vec<TagRecord>,
    /// Rows of `way_nodes`.
    pub way_nodes: Vec<WayNodeRecord>,
    finish_calls: usize,
}

impl MemorySink {
    /// An empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `finish` has been called.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finish_calls > 0
    }

    /// How many times `finish` has been called.
    #[must_use]
    pub const fn finish_calls(&self) -> usize {
        self.finish_calls
    }

    /// Total number of rows across all relations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
            + self.node_tags.len()
            + self.ways.len()
            + self.way_tags.len()
            + self.way_nodes.len()
    }

    /// Whether no row has been written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RelationSink for MemorySink {
    fn write(&mut self, bundle: &Bundle) -> Result<(), SinkError> {
        if self.is_finished() {
            return Err(SinkError::Finished);
        }
        match bundle {
            Bundle::Node(node) => {
                self.nodes.push(node.node.clone());
                self.node_tags.extend(node.tags.iter().cloned());
            }
            Bundle::Way(way) => {
                self.ways.push(way.way.clone());
                self.way_nodes.extend(way.way_nodes.iter().cloned());
                self.way_tags.extend(way.tags.iter().cloned());
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finish_calls += 1;
        Ok(())
    }
}
