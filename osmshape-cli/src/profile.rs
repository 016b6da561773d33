//! Profile command: document statistics as JSON.

use std::io::{self, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmshape_data::{DocumentProfile, ElementFilter, open_document, profile_document};
use serde::{Deserialize, Serialize};

use crate::{ARG_OSM, CliError, ENV_PROFILE_OSM, require_existing};

/// CLI arguments for the `profile` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "profile",
    about = "Print element, tag key and contributor statistics for an OSM document"
)]
#[ortho_config(prefix = "OSMSHAPE")]
pub(crate) struct ProfileArgs {
    /// Path to the OSM XML document (`.osm` or `.osm.bz2`).
    #[arg(long = ARG_OSM, value_name = "path")]
    #[serde(default)]
    pub(crate) osm: Option<Utf8PathBuf>,
}

/// Resolved `profile` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProfileConfig {
    pub(crate) osm: Utf8PathBuf,
}

impl TryFrom<ProfileArgs> for ProfileConfig {
    type Error = CliError;

    fn try_from(args: ProfileArgs) -> Result<Self, Self::Error> {
        let osm = args.osm.ok_or(CliError::MissingArgument {
            field: ARG_OSM,
            env: ENV_PROFILE_OSM,
        })?;
        Ok(Self { osm })
    }
}

#[derive(Serialize)]
struct ProfileOutput<'a> {
    #[serde(flatten)]
    profile: &'a DocumentProfile,
    unique_contributors: usize,
}

pub(crate) fn run_profile(args: ProfileArgs) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    run_profile_with(args, &mut handle)
}

pub(crate) fn run_profile_with(args: ProfileArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ProfileConfig::try_from(merged)?;
    require_existing(&config.osm, ARG_OSM)?;
    let profile = execute_profile(&config)?;
    write_profile(&profile, out)
}

pub(crate) fn execute_profile(config: &ProfileConfig) -> Result<DocumentProfile, CliError> {
    let reader =
        open_document(&config.osm, ElementFilter::all()).map_err(CliError::OpenDocument)?;
    profile_document(reader).map_err(|source| CliError::Profile {
        path: config.osm.clone(),
        source,
    })
}

pub(crate) fn write_profile(
    profile: &DocumentProfile,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let output = ProfileOutput {
        profile,
        unique_contributors: profile.unique_contributors(),
    };
    serde_json::to_writer_pretty(&mut *out, &output).map_err(CliError::SerialiseProfile)?;
    writeln!(out).map_err(CliError::WriteProfile)?;
    out.flush().map_err(CliError::WriteProfile)
}
