//! Behaviour-driven step definitions driving the convert and profile scenarios.

use super::helpers::Workspace;
use super::*;
use crate::convert::ConvertOutcome;
use crate::profile::run_profile_with;
use osmshape_core::Relation;
use osmshape_data::file_name;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Scenario state shared across steps so each step takes a single world
/// argument.
struct CliWorld {
    workspace: Workspace,
    cli_args: RefCell<Vec<String>>,
    convert_result: RefCell<Option<Result<ConvertOutcome, CliError>>>,
    profile_output: RefCell<Option<Result<String, CliError>>>,
}

impl CliWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            cli_args: RefCell::new(Vec::new()),
            convert_result: RefCell::new(None),
            profile_output: RefCell::new(None),
        }
    }

    fn push_args<const N: usize>(&self, args: [String; N]) {
        self.cli_args.borrow_mut().extend(args);
    }

    fn with_outcome<T>(&self, check: impl FnOnce(&Result<ConvertOutcome, CliError>) -> T) -> T {
        let borrowed = self.convert_result.borrow();
        check(borrowed.as_ref().expect("convert command was run"))
    }
}

#[fixture]
fn world() -> CliWorld {
    CliWorld::new()
}

#[given("an OSM document on disk")]
fn document_exists(#[from(world)] world: &CliWorld) {
    assert!(
        world.workspace.osm().is_file(),
        "expected the sample document to exist on disk"
    );
}

#[given("I pass the document and an output directory with CLI flags")]
fn cli_provides_paths(#[from(world)] world: &CliWorld) {
    world.push_args([
        format!("--{ARG_OSM}"),
        world.workspace.osm().into_string(),
        format!("--{ARG_OUTPUT_DIR}"),
        world.workspace.output_dir().into_string(),
    ]);
}

#[given("I pass only an output directory")]
fn cli_only_output_dir(#[from(world)] world: &CliWorld) {
    world.push_args([
        format!("--{ARG_OUTPUT_DIR}"),
        world.workspace.output_dir().into_string(),
    ]);
}

#[given("I request SQLite output")]
fn request_sqlite(#[from(world)] world: &CliWorld) {
    world.push_args([format!("--{ARG_FORMAT}"), "sqlite".to_owned()]);
}

#[given("I request the \"lenient\" validation mode")]
fn request_lenient(#[from(world)] world: &CliWorld) {
    world.push_args([format!("--{ARG_VALIDATION}"), "lenient".to_owned()]);
}

#[when("I run the convert command")]
fn run_convert_command(#[from(world)] world: &CliWorld) {
    let mut invocation = vec!["osmshape".to_owned(), "convert".to_owned()];
    invocation.extend(world.cli_args.borrow().iter().cloned());
    let outcome = Cli::try_parse_from(invocation)
        .map_err(CliError::ArgumentParsing)
        .and_then(|cli| match cli.command {
            Command::Convert(args) => convert::run_convert(args),
            Command::Profile(_) => panic!("expected the convert subcommand"),
        });
    world.convert_result.replace(Some(outcome));
}

#[when("I profile the document")]
fn profile_document(#[from(world)] world: &CliWorld) {
    let invocation = vec![
        "osmshape".to_owned(),
        "profile".to_owned(),
        format!("--{ARG_OSM}"),
        world.workspace.osm().into_string(),
    ];
    let output = Cli::try_parse_from(invocation)
        .map_err(CliError::ArgumentParsing)
        .and_then(|cli| match cli.command {
            Command::Profile(args) => {
                let mut buffer = Vec::new();
                run_profile_with(args, &mut buffer)?;
                Ok(String::from_utf8(buffer).expect("profile output is UTF-8"))
            }
            Command::Convert(_) => panic!("expected the profile subcommand"),
        });
    world.profile_output.replace(Some(output));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &CliWorld) {
    world.with_outcome(|result| {
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
    });
}

#[then("the output directory holds one CSV file per relation")]
fn csv_outputs_exist(#[from(world)] world: &CliWorld) {
    let dir = world.workspace.output_dir();
    world.with_outcome(|result| {
        let outcome = result.as_ref().expect("expected success");
        let expected: Vec<_> = Relation::ALL
            .into_iter()
            .map(|relation| dir.join(file_name(relation)))
            .collect();
        assert_eq!(outcome.outputs(), expected.as_slice());
    });
    for relation in Relation::ALL {
        let path = dir.join(file_name(relation));
        assert!(path.is_file(), "expected {path} to exist");
    }
}

#[then("the database holds 2 nodes and 1 way")]
fn database_rows(#[from(world)] world: &CliWorld) {
    let path = world
        .workspace
        .output_dir()
        .join(osmshape_data::DATABASE_FILE_NAME);
    let connection = rusqlite::Connection::open(path.as_std_path()).expect("open database");
    let count = |table: &str| -> i64 {
        connection
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap_or_else(|err| panic!("failed to count {table}: {err}"))
    };
    assert_eq!(count("nodes"), 2);
    assert_eq!(count("ways"), 1);
    assert_eq!(count("way_nodes"), 2);
}

#[then("the CLI reports that the \"osm\" flag is missing")]
fn reports_missing_osm(#[from(world)] world: &CliWorld) {
    world.with_outcome(|result| match result {
        Err(CliError::MissingArgument { field, .. }) => assert_eq!(*field, ARG_OSM),
        other => panic!("unexpected result {other:?}"),
    });
}

#[then("argument parsing fails")]
fn argument_parsing_fails(#[from(world)] world: &CliWorld) {
    world.with_outcome(|result| {
        assert!(
            matches!(result, Err(CliError::ArgumentParsing(_))),
            "unexpected result {result:?}"
        );
    });
}

#[then("the profile reports 3 unique contributors")]
fn profile_contributors(#[from(world)] world: &CliWorld) {
    let borrowed = world.profile_output.borrow();
    let output = borrowed
        .as_ref()
        .expect("profile command was run")
        .as_ref()
        .expect("expected success");
    let value: serde_json::Value = serde_json::from_str(output).expect("valid JSON");
    assert_eq!(value["unique_contributors"], 3);
    assert_eq!(value["element_counts"]["osm"], 1);
}

macro_rules! register_cli_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/convert_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CliWorld) {
            let _ = world;
        }
    };
}

register_cli_scenario!(csv_conversion, "converting a document to CSV files");
register_cli_scenario!(sqlite_conversion, "converting a document to a SQLite database");
register_cli_scenario!(rejecting_missing_document, "rejecting a missing document flag");
register_cli_scenario!(rejecting_unknown_mode, "rejecting an unknown validation mode");
register_cli_scenario!(profiling, "profiling a document");
