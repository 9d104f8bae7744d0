//! prtool CLI entrypoint for merged pull request reports.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    match cli::run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "Error: {error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}
