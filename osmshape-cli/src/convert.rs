//! Convert command implementation for the osmshape CLI.

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmshape_core::{Relation, Schema};
use osmshape_data::{
    ConversionReport, ConvertOptions, CsvSink, ElementFilter, RelationSink, ValidationMode,
    convert, file_name, open_document,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_FORMAT, ARG_OSM, ARG_OUTPUT_DIR, ARG_SCHEMA, ARG_VALIDATION, CliError, ENV_CONVERT_OSM,
    ENV_CONVERT_OUTPUT_DIR, require_existing,
};

/// How schema failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ValidationArg {
    /// Write everything without checking.
    Disabled,
    /// Stop at the first failing element.
    #[default]
    Fatal,
    /// Skip failing elements and report them.
    Quarantine,
}

impl From<ValidationArg> for ValidationMode {
    fn from(value: ValidationArg) -> Self {
        match value {
            ValidationArg::Disabled => Self::Disabled,
            ValidationArg::Fatal => Self::Fatal,
            ValidationArg::Quarantine => Self::Quarantine,
        }
    }
}

/// Where the relations are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// One CSV file per relation.
    #[default]
    Csv,
    /// One SQLite database (`osm.db`) with a table per relation.
    Sqlite,
}

/// CLI arguments for the `convert` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "convert",
    long_about = "Stream an OSM XML document (optionally bzip2-compressed), \
                 shape every node and way into relational records, validate \
                 them and write nodes, node_tags, ways, way_tags and \
                 way_nodes. Paths can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Convert an OSM XML document into relational tables"
)]
#[ortho_config(prefix = "OSMSHAPE")]
pub(crate) struct ConvertArgs {
    /// Path to the OSM XML document (`.osm` or `.osm.bz2`).
    #[arg(long = ARG_OSM, value_name = "path")]
    #[serde(default)]
    pub(crate) osm: Option<Utf8PathBuf>,
    /// Directory receiving the output files; created when missing.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// JSON schema overriding the built-in field contract.
    #[arg(long = ARG_SCHEMA, value_name = "path")]
    #[serde(default)]
    pub(crate) schema: Option<Utf8PathBuf>,
    /// Handling of elements that fail the schema.
    #[arg(long = ARG_VALIDATION, value_enum)]
    #[serde(default)]
    pub(crate) validation: Option<ValidationArg>,
    /// Output format.
    #[arg(long = ARG_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

impl ConvertArgs {
    pub(crate) fn into_config(self) -> Result<ConvertConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ConvertConfig::try_from(merged)
    }
}

/// Resolved `convert` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConvertConfig {
    /// OSM XML input.
    pub(crate) osm: Utf8PathBuf,
    /// Directory receiving the outputs.
    pub(crate) output_dir: Utf8PathBuf,
    /// Optional schema override.
    pub(crate) schema: Option<Utf8PathBuf>,
    /// Validation handling.
    pub(crate) validation: ValidationMode,
    /// Output format.
    pub(crate) format: OutputFormat,
}

impl ConvertConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.osm, ARG_OSM)?;
        if let Some(schema) = &self.schema {
            require_existing(schema, ARG_SCHEMA)?;
        }
        self.require_output_dir()
    }

    fn require_output_dir(&self) -> Result<(), CliError> {
        let path = &self.output_dir;
        match osmshape_fs::dir_is_dir(path) {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(source) => {
                return Err(CliError::InspectSourcePath {
                    field: ARG_OUTPUT_DIR,
                    path: path.clone(),
                    source,
                });
            }
        }
        match osmshape_fs::file_is_file(path) {
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_OUTPUT_DIR,
                path: path.clone(),
                source,
            }),
            Ok(_) => Err(CliError::OutputDirectoryNotDirectory { path: path.clone() }),
        }
    }
}

impl TryFrom<ConvertArgs> for ConvertConfig {
    type Error = CliError;

    fn try_from(args: ConvertArgs) -> Result<Self, Self::Error> {
        let osm = args.osm.ok_or(CliError::MissingArgument {
            field: ARG_OSM,
            env: ENV_CONVERT_OSM,
        })?;
        let output_dir = args.output_dir.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT_DIR,
            env: ENV_CONVERT_OUTPUT_DIR,
        })?;
        Ok(Self {
            osm,
            output_dir,
            schema: args.schema,
            validation: args.validation.unwrap_or_default().into(),
            format: args.format.unwrap_or_default(),
        })
    }
}

/// Result of a successful conversion.
#[derive(Debug)]
pub(crate) struct ConvertOutcome {
    report: ConversionReport,
    outputs: Vec<Utf8PathBuf>,
}

impl ConvertOutcome {
    pub(crate) const fn report(&self) -> &ConversionReport {
        &self.report
    }

    pub(crate) fn outputs(&self) -> &[Utf8PathBuf] {
        &self.outputs
    }
}

pub(crate) fn run_convert(args: ConvertArgs) -> Result<ConvertOutcome, CliError> {
    let config = resolve_convert_config(args)?;
    execute_convert(&config)
}

fn resolve_convert_config(args: ConvertArgs) -> Result<ConvertConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_convert(config: &ConvertConfig) -> Result<ConvertOutcome, CliError> {
    let schema = load_schema(config.schema.as_deref())?;
    let reader = open_document(&config.osm, ElementFilter::default().with_relations())
        .map_err(CliError::OpenDocument)?;
    osmshape_fs::ensure_dir(&config.output_dir).map_err(|source| {
        CliError::CreateOutputDirectory {
            path: config.output_dir.clone(),
            source,
        }
    })?;
    let (mut sink, outputs) = open_sink(config.format, &config.output_dir)?;
    let options = ConvertOptions {
        validation: config.validation,
    };
    let report = convert(reader, &mut sink, &schema, &options)?;
    Ok(ConvertOutcome { report, outputs })
}

type OpenedSink = (Box<dyn RelationSink>, Vec<Utf8PathBuf>);

fn open_sink(format: OutputFormat, dir: &Utf8Path) -> Result<OpenedSink, CliError> {
    match format {
        OutputFormat::Csv => {
            let sink = CsvSink::create(dir)?;
            let outputs = Relation::ALL
                .into_iter()
                .map(|relation| dir.join(file_name(relation)))
                .collect();
            Ok((Box::new(sink), outputs))
        }
        OutputFormat::Sqlite => open_sqlite_sink(dir),
    }
}

#[cfg(feature = "store-sqlite")]
fn open_sqlite_sink(dir: &Utf8Path) -> Result<OpenedSink, CliError> {
    let path = dir.join(osmshape_data::DATABASE_FILE_NAME);
    let sink = osmshape_data::SqliteSink::create(&path)?;
    Ok((Box::new(sink), vec![path]))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_sqlite_sink(_dir: &Utf8Path) -> Result<OpenedSink, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "writing SQLite output",
    })
}

/// Load the schema override, or the built-in contract when none is given.
pub(crate) fn load_schema(path: Option<&Utf8Path>) -> Result<Schema, CliError> {
    let Some(schema_path) = path else {
        return Ok(Schema::default());
    };
    let file =
        osmshape_fs::open_utf8_file(schema_path).map_err(|source| CliError::OpenSchema {
            path: schema_path.to_path_buf(),
            source,
        })?;
    Schema::from_json_reader(BufReader::new(file.into_std())).map_err(|source| {
        CliError::ParseSchema {
            path: schema_path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ConvertConfig, CliError> {
    let merged = ConvertArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ConvertConfig::try_from(merged)
}
