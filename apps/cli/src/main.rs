mod commands;
mod env;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "castctl", about = "Podcast transcript tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw ASR transcript into the compact persisted shape
    Normalize {
        #[arg(long, short)]
        input: PathBuf,
        /// Defaults to stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long, env = "CASTCTL_PRETTY")]
        pretty: bool,
    },
    /// Print the segment table of a raw or compact transcript
    Inspect {
        #[arg(long, short)]
        input: PathBuf,
        /// Also show the segment active at this position (milliseconds)
        #[arg(long)]
        at: Option<i64>,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = env::load()?;

    match cli.command {
        Commands::Normalize {
            input,
            output,
            pretty,
        } => commands::normalize::run(
            commands::normalize::Args {
                input,
                output,
                pretty,
            },
            settings.split,
        ),
        Commands::Inspect { input, at } => {
            commands::inspect::run(commands::inspect::Args { input, at }, settings.split)
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}
