//! Longbox - comic catalog backend
//!
//! Usage:
//!   longbox series create "Moon Saga"                  Create a series
//!   longbox installment create MOONSAGA --number 7-11  Add an installment
//!   longbox appearance set MOONSAGA/7-11 ...           Record who appears where
//!   longbox thread order crossover                     Show a reading order
//!   longbox --help                                     Show all commands

use anyhow::Result;
use clap::{CommandFactory, Parser};

use longbox::cli::output::OutputMode;
use longbox::cli::{Cli, Commands};
use longbox::init::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("longbox=info".parse()?),
        )
        .init();

    let mode = OutputMode::from_json_flag(cli.json);

    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
        }
        cmd => {
            let ctx = AppContext::new(cli.data_path.clone()).await?;
            longbox::cli::execute(cmd, &ctx, mode).await?;
        }
    }

    Ok(())
}
