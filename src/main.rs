use trivia_api::{config::AppConfig, server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and friends apply to local runs
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = AppConfig::from_env();
    server::serve(config).await
}
