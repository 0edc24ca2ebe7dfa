use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod compile;
mod error;
mod repl;

use cli::Cli;
use error::AppError;

fn main() -> ExitCode {
    // Diagnostics go to stderr, RUST_LOG picks the level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let result = match &cli.file {
        Some(path) => std::fs::read(path)
            .map_err(|source| AppError::Read {
                path: path.clone(),
                source,
            })
            .and_then(|src| compile::compile_src(&src, &cli)),

        None => repl::ast_parser_driver(&cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
