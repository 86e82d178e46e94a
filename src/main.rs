//! ML Workbench - Main Entry Point
//!
//! Trains a model from the command line or serves the train/predict API.

use clap::Parser;
use ml_workbench::cli::{cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ml_workbench=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { data, target, model, problem_type, plots_dir, predict } => {
            cmd_train(&data, &target, &model, &problem_type, &plots_dir, &predict)?;
        }
        Commands::Serve { port, host } => {
            cmd_serve(&host, port).await?;
        }
    }

    Ok(())
}
