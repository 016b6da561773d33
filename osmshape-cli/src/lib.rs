//! Command-line interface for turning OSM XML extracts into relational tables.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use log::{info, warn};

mod convert;
mod error;
mod logging;
mod profile;

use convert::{ConvertArgs, ConvertOutcome};
pub use error::CliError;
pub use logging::{LOG_ENV, init_logging};
use profile::ProfileArgs;

const ARG_OSM: &str = "osm";
const ARG_OUTPUT_DIR: &str = "output-dir";
const ARG_SCHEMA: &str = "schema";
const ARG_VALIDATION: &str = "validation";
const ARG_FORMAT: &str = "format";
const ENV_CONVERT_OSM: &str = "OSMSHAPE_CMDS_CONVERT_OSM";
const ENV_CONVERT_OUTPUT_DIR: &str = "OSMSHAPE_CMDS_CONVERT_OUTPUT_DIR";
const ENV_PROFILE_OSM: &str = "OSMSHAPE_CMDS_PROFILE_OSM";

/// Run the osmshape CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Convert(args) => {
            let outcome = convert::run_convert(args)?;
            log_outcome(&outcome);
        }
        Command::Profile(args) => profile::run_profile(args)?,
    }
    Ok(())
}

fn log_outcome(outcome: &ConvertOutcome) {
    for path in outcome.outputs() {
        info!("wrote {path}");
    }
    let quarantined = &outcome.report().quarantined;
    if !quarantined.is_empty() {
        warn!("{} elements were quarantined", quarantined.len());
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "osmshape",
    about = "Convert OpenStreetMap XML extracts into relational tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Shape, validate and write nodes and ways as CSV files or SQLite tables.
    Convert(ConvertArgs),
    /// Print element, tag key and contributor statistics as JSON.
    Profile(ProfileArgs),
}

/// Fail unless `path` names an existing regular file.
fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match osmshape_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
