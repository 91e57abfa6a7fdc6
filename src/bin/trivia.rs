use clap::Parser;
use trivia_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    trivia_api::telemetry::init_tracing();

    let cli = Cli::parse();

    // Errors are already reported in the selected output format
    if trivia_api::cli::run(cli).await.is_err() {
        std::process::exit(1);
    }

    Ok(())
}
