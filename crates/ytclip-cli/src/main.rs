mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings only by default so log lines don't interleave with prompts
    let filter = match cli.verbose {
        0 => "ytclip=warn",
        1 => "ytclip=info",
        2 => "ytclip=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Commands::Edit { source }) => commands::edit::run(&source, config_path).await,
        Some(Commands::Clip { source, options }) => {
            commands::clip::run(&source, &options, config_path).await
        }
        Some(Commands::Doctor) => commands::doctor::run(config_path).await,
        Some(Commands::Config) => commands::config::run(config_path).await,
        None => {
            // A bare source means an interactive edit
            if let Some(source) = cli.source {
                commands::edit::run(&source, config_path).await
            } else {
                use clap::CommandFactory;
                Cli::command().print_help()?;
                println!();
                Ok(())
            }
        }
    }
}
