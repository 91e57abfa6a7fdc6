use clap::ValueEnum;
use serde_json::json;
use sqlx::PgPool;

use crate::cli::{utils::output_success, OutputFormat};
use crate::database::models::{Answer, Category, Post, Quiz};
use crate::database::{Repository, Resource};

/// Resource tables that may be emptied from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClearTarget {
    Categories,
    Quizzes,
    Answers,
    Posts,
}

pub async fn handle(target: ClearTarget, pool: &PgPool, output_format: &OutputFormat) -> anyhow::Result<()> {
    let (table, rows) = match target {
        ClearTarget::Categories => clear::<Category>(pool).await?,
        ClearTarget::Quizzes => clear::<Quiz>(pool).await?,
        ClearTarget::Answers => clear::<Answer>(pool).await?,
        ClearTarget::Posts => clear::<Post>(pool).await?,
    };

    output_success(
        output_format,
        &format!("Cleared {} rows from {}", rows, table),
        Some(json!({ "table": table, "rows": rows })),
    )
}

async fn clear<T: Resource>(pool: &PgPool) -> anyhow::Result<(&'static str, u64)> {
    let rows = Repository::<T>::new(pool).clear().await?;
    Ok((T::TABLE, rows))
}
