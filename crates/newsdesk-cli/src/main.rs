mod commands;
mod job;
mod schedule;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newsdesk")]
#[command(about = "Fetch, enrich and store news articles")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline once
    Run {
        /// Keep results in memory and print the report instead of writing
        /// to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Run the pipeline on NEWSDESK_SCHEDULE until interrupted
    Schedule,
    /// Print the status document of the last successful run
    Status,
    /// Database management commands
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Verify the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = newsdesk_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Run { dry_run } => commands::run_once(&config, dry_run).await,
        Commands::Schedule => commands::run_scheduled(&config).await,
        Commands::Status => commands::print_status(&config).await,
        Commands::Db { command } => match command {
            DbCommands::Ping => commands::db_ping(&config).await,
            DbCommands::Migrate => commands::db_migrate(&config).await,
        },
    }
}

#[cfg(test)]
mod tests;
