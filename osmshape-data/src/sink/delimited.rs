//! CSV output, one file per relation.

use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use osmshape_core::{Bundle, Relation, Row};

use super::{RelationSink, SinkError};

/// File name used for a relation, for example `way_nodes.csv`.
#[must_use]
pub fn file_name(relation: Relation) -> String {
    format!("{}.csv", relation.name())
}

/// One value per output relation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationOutputs<T> {
    /// Output for [`Relation::Nodes`].
    pub nodes: T,
    /// Output for [`Relation::NodeTags`].
    pub node_tags: T,
    /// Output for [`Relation::Ways`].
    pub ways: T,
    /// Output for [`Relation::WayTags`].
    pub way_tags: T,
    /// Output for [`Relation::WayNodes`].
    pub way_nodes: T,
}

impl<T> RelationOutputs<T> {
    /// Build each output from its relation.
    pub fn try_from_fn<E, F>(mut make: F) -> Result<Self, E>
    where
        F: FnMut(Relation) -> Result<T, E>,
    {
        Ok(Self {
            nodes: make(Relation::Nodes)?,
            node_tags: make(Relation::NodeTags)?,
            ways: make(Relation::Ways)?,
            way_tags: make(Relation::WayTags)?,
            way_nodes: make(Relation::WayNodes)?,
        })
    }

    /// Convert each output, stopping at the first failure.
    pub fn try_map<U, E, F>(self, mut convert: F) -> Result<RelationOutputs<U>, E>
    where
        F: FnMut(Relation, T) -> Result<U, E>,
    {
        Ok(RelationOutputs {
            nodes: convert(Relation::Nodes, self.nodes)?,
            node_tags: convert(Relation::NodeTags, self.node_tags)?,
            ways: convert(Relation::Ways, self.ways)?,
            way_tags: convert(Relation::WayTags, self.way_tags)?,
            way_nodes: convert(Relation::WayNodes, self.way_nodes)?,
        })
    }

    /// Output for `relation`.
    pub const fn get_mut(&mut self, relation: Relation) -> &mut T {
        match relation {
            Relation::Nodes => &mut self.nodes,
            Relation::NodeTags => &mut self.node_tags,
            Relation::Ways => &mut self.ways,
            Relation::WayTags => &mut self.way_tags,
            Relation::WayNodes => &mut self.way_nodes,
        }
    }
}

/// Writes each relation as a UTF-8 CSV stream with a header row.
///
/// Fields are quoted only when needed; values are written exactly as they
/// appear in the records.
///
/// # Examples
/// ```
/// use osmshape_data::{CsvSink, RelationOutputs, RelationSink};
///
/// let mut sink = CsvSink::from_writers(RelationOutputs::<Vec<u8>>::default())?;
/// sink.finish()?;
/// let outputs = sink.into_inner()?;
/// assert_eq!(outputs.way_nodes, b"id,node_id,position\n");
/// # Ok::<(), osmshape_data::SinkError>(())
/// ```
pub struct CsvSink<W: Write> {
    writers: RelationOutputs<csv::Writer<W>>,
}

impl CsvSink<BufWriter<File>> {
    /// Create `nodes.csv`, `node_tags.csv`, `ways.csv`, `way_tags.csv` and
    /// `way_nodes.csv` inside `dir`, creating the directory when missing.
    /// Existing files are truncated.
    pub fn create(dir: &Utf8Path) -> Result<Self, SinkError> {
        osmshape_fs::ensure_dir(dir).map_err(|source| SinkError::Create {
            path: dir.to_path_buf(),
            source,
        })?;
        let files = RelationOutputs::try_from_fn(|relation| {
            let path = dir.join(file_name(relation));
            osmshape_fs::create_utf8_file(&path)
                .map(BufWriter::new)
                .map_err(|source| SinkError::Create { path, source })
        })?;
        Self::from_writers(files)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap already-open writers and emit the header row of each relation.
    pub fn from_writers(outputs: RelationOutputs<W>) -> Result<Self, SinkError> {
        let writers = outputs.try_map(|relation, output| {
            let mut writer = csv::Writer::from_writer(output);
            writer
                .write_record(relation.fields())
                .map_err(|source| SinkError::Csv { relation, source })?;
            Ok::<_, SinkError>(writer)
        })?;
        Ok(Self { writers })
    }

    /// Flush and hand back the underlying writers.
    pub fn into_inner(self) -> Result<RelationOutputs<W>, SinkError> {
        self.writers.try_map(|relation, writer| {
            writer.into_inner().map_err(|err| SinkError::Flush {
                relation,
                source: err.into_error(),
            })
        })
    }

    fn write_row<R: Row>(&mut self, relation: Relation, row: &R) -> Result<(), SinkError> {
        let values = row.values(relation);
        self.writers
            .get_mut(relation)
            .write_record(values.iter().map(|value| value.as_bytes()))
            .map_err(|source| SinkError::Csv { relation, source })
    }
}

impl<W: Write> RelationSink for CsvSink<W> {
    fn write(&mut self, bundle: &Bundle) -> Result<(), SinkError> {
        match bundle {
            Bundle::Node(node) => {
                self.write_row(Relation::Nodes, &node.node)?;
                for tag in &node.tags {
                    self.write_row(Relation::NodeTags, tag)?;
                }
            }
            Bundle::Way(way) => {
                self.write_row(Relation::Ways, &way.way)?;
                for way_node in &way.way_nodes {
                    self.write_row(Relation::WayNodes, way_node)?;
                }
                for tag in &way.tags {
                    self.write_row(Relation::WayTags, tag)?;
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        for relation in Relation::ALL {
            self.writers
                .get_mut(relation)
                .flush()
                .map_err(|source| SinkError::Flush { relation, source })?;
        }
        Ok(())
    }
}
