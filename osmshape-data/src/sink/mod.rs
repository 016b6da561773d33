//! Destinations for shaped bundles.
//!
//! A sink receives every bundle that passed validation, in document order,
//! and writes its records to the five relations. Implementations must accept
//! any Unicode text unchanged.

use camino::Utf8PathBuf;
use osmshape_core::{Bundle, Relation};
use thiserror::Error;

mod delimited;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use self::delimited::{CsvSink, RelationOutputs, file_name};
pub use self::memory::MemorySink;
#[cfg(feature = "store-sqlite")]
pub use self::sqlite::{DATABASE_FILE_NAME, SqliteSink};

/// Errors raised by sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    /// An output file or database could not be created.
    #[error("failed to create output at {path:?}")]
    Create {
        /// Path that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A CSV row could not be written.
    #[error("failed to write a {relation} row")]
    Csv {
        /// Relation being written.
        relation: Relation,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// Buffered output could not be flushed.
    #[error("failed to flush {relation} output")]
    Flush {
        /// Relation being flushed.
        relation: Relation,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A database statement failed.
    #[cfg(feature = "store-sqlite")]
    #[error("SQLite failed to {operation}")]
    Sqlite {
        /// What the sink was doing.
        operation: &'static str,
        /// Underlying database error.
        #[source]
        source: rusqlite::Error,
    },
    /// The sink was written to after it had been finished.
    #[error("sink was used after it was finished")]
    Finished,
}

/// Receives validated bundles and persists their records.
///
/// `finish` flushes and closes the outputs. The pipeline calls it exactly
/// once, on success and on failure alike; implementations must tolerate a
/// second call.
pub trait RelationSink {
    /// Write every record of `bundle` to its relation.
    fn write(&mut self, bundle: &Bundle) -> Result<(), SinkError>;

    /// Flush and close all outputs.
    fn finish(&mut self) -> Result<(), SinkError>;
}

impl<S: RelationSink + ?Sized> RelationSink for Box<S> {
    fn write(&mut self, bundle: &Bundle) -> Result<(), SinkError> {
        (**self).write(bundle)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

impl<S: RelationSink + ?Sized> RelationSink for &mut S {
    fn write(&mut self, bundle: &Bundle) -> Result<(), SinkError> {
        (**self).write(bundle)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}
