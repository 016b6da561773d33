//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::error::Error;

use osmshape_cli::{CliError, init_logging, run};

fn main() {
    let result = init_logging().and_then(|()| run());
    match result {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "fatal errors are reported directly before the process exits"
)]
fn report(err: &CliError) {
    eprintln!("osmshape: {}", describe(err));
}

fn describe(err: &CliError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
