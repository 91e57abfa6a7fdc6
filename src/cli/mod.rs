pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "trivia")]
#[command(about = "Trivia CLI - table maintenance for the Trivia API database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create every table that does not exist yet")]
    Prepare,

    #[command(about = "Drop every table")]
    Revert,

    #[command(about = "Delete all rows of one resource table")]
    Clear {
        #[arg(value_enum)]
        resource: commands::clear::ClearTarget,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();
    let pool = DatabaseManager::connect(&config.database).await?;

    let result = dispatch(cli.command, &pool, &output_format).await;
    DatabaseManager::close(pool).await;

    if let Err(e) = &result {
        utils::output_error(&output_format, &format!("{:#}", e))?;
    }
    result
}

async fn dispatch(command: Commands, pool: &PgPool, output_format: &OutputFormat) -> anyhow::Result<()> {
    match command {
        Commands::Prepare => commands::tables::prepare(pool, output_format).await,
        Commands::Revert => commands::tables::revert(pool, output_format).await,
        Commands::Clear { resource } => commands::clear::handle(resource, pool, output_format).await,
    }
}
