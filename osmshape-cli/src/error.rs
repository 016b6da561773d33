//! Error types emitted by the osmshape CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osmshape_core::SchemaError;
use osmshape_data::{ConvertError, ReadError, SinkError};
use thiserror::Error;

/// Errors emitted by the osmshape CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The log subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature that must be enabled.
        feature: &'static str,
        /// What the user asked for.
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Path that was given.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Path that was given.
        path: Utf8PathBuf,
    },
    /// A referenced path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Path that was given.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The output directory exists but is not a directory.
    #[error("output directory {path:?} is not a directory")]
    OutputDirectoryNotDirectory {
        /// Path that was given.
        path: Utf8PathBuf,
    },
    /// The output directory could not be created.
    #[error("failed to create output directory {path:?}: {source}")]
    CreateOutputDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the schema file failed.
    #[error("failed to open schema at {path:?}: {source}")]
    OpenSchema {
        /// Schema path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The schema file is not a valid schema.
    #[error("invalid schema in {path:?}: {source}")]
    ParseSchema {
        /// Schema path.
        path: Utf8PathBuf,
        /// Underlying schema error.
        #[source]
        source: SchemaError,
    },
    /// Opening the OSM document failed.
    #[error("failed to open OSM document: {0}")]
    OpenDocument(#[source] ReadError),
    /// The outputs could not be prepared.
    #[error("failed to prepare outputs: {0}")]
    PrepareOutputs(#[from] SinkError),
    /// The conversion aborted.
    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),
    /// Profiling the document failed while reading it.
    #[error("failed to profile {path:?}: {source}")]
    Profile {
        /// Document path.
        path: Utf8PathBuf,
        /// Underlying read error.
        #[source]
        source: ReadError,
    },
    /// Serialising the profile failed.
    #[error("failed to serialise profile: {0}")]
    SerialiseProfile(#[source] serde_json::Error),
    /// Writing the profile failed.
    #[error("failed to write profile output: {0}")]
    WriteProfile(#[source] std::io::Error),
}
