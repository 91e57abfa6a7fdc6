use serde_json::json;
use sqlx::PgPool;

use crate::cli::{utils::output_success, OutputFormat};
use crate::database::schema::{self, PREPARATIONS};

fn table_names() -> Vec<&'static str> {
    PREPARATIONS.iter().map(|p| p.table).collect()
}

/// trivia prepare
pub async fn prepare(pool: &PgPool, output_format: &OutputFormat) -> anyhow::Result<()> {
    schema::prepare(pool).await?;
    output_success(
        output_format,
        "Prepared all tables",
        Some(json!({ "tables": table_names() })),
    )
}

/// trivia revert
pub async fn revert(pool: &PgPool, output_format: &OutputFormat) -> anyhow::Result<()> {
    schema::revert(pool).await?;
    let mut tables = table_names();
    tables.reverse();
    output_success(output_format, "Dropped all tables", Some(json!({ "tables": tables })))
}
