mod cli;
mod commands;
mod error;
mod index;
mod mcp;
mod naming;
mod numbering;
mod pdf;
mod plan;
mod prompt;
mod ranges;
mod resolve;
mod splitter;

use clap::Parser;
use cli::{Cli, Commands};
use error::{ExitCode, SplitError};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // stdout carries the summary and the MCP transport, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Mcp => mcp::run_server().await.map_err(SplitError::from),
        Commands::Split(args) => commands::split::run(&args, false),
        Commands::Plan(args) => commands::split::run(&args, true),
        Commands::Info { path } => commands::info::run(&path).map_err(SplitError::from),
        Commands::PageLabels { path } => {
            pdf::page_labels::extract_page_labels(&path)
                .map(|labels| {
                    for label in labels {
                        println!("{}: {}", label.physical_page, label.logical_label);
                    }
                })
                .map_err(SplitError::from)
        }
    };

    match result {
        Ok(()) => ExitCode::Success.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.exit_code().into()
        }
    }
}
