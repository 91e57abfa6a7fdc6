//! Table preparations run at boot (`prepare`) and torn down by the CLI (`revert`).
//!
//! Statements are idempotent. Categories, quizzes and answers carry no
//! foreign-key constraints between each other: references are checked at
//! write time and deleting a parent leaves its children in place.

use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// A single table and the DDL that creates it
pub struct Preparation {
    pub table: &'static str,
    pub create: &'static str,
}

/// In dependency order; `revert` walks it backwards
pub const PREPARATIONS: &[Preparation] = &[
    Preparation {
        table: "users",
        create: r#"CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )"#,
    },
    Preparation {
        table: "tokens",
        create: r#"CREATE TABLE IF NOT EXISTS tokens (
            id BIGSERIAL PRIMARY KEY,
            token TEXT NOT NULL UNIQUE,
            user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
    },
    Preparation {
        table: "posts",
        create: r#"CREATE TABLE IF NOT EXISTS posts (
            id BIGSERIAL PRIMARY KEY,
            content TEXT NOT NULL
        )"#,
    },
    Preparation {
        table: "categories",
        create: r#"CREATE TABLE IF NOT EXISTS categories (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            "imageUrl" TEXT NOT NULL DEFAULT '',
            describe TEXT NOT NULL DEFAULT ''
        )"#,
    },
    Preparation {
        table: "quizzes",
        create: r#"CREATE TABLE IF NOT EXISTS quizzes (
            id BIGSERIAL PRIMARY KEY,
            content TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT '',
            "rightAnswerId" BIGINT NOT NULL DEFAULT 0,
            "rightAnswerString" TEXT NOT NULL DEFAULT '',
            "mediaUrl" TEXT NOT NULL DEFAULT '',
            "mediaType" TEXT NOT NULL DEFAULT '',
            level BIGINT NOT NULL DEFAULT 0,
            category_id BIGINT NOT NULL,
            points DOUBLE PRECISION NOT NULL DEFAULT 0
        )"#,
    },
    Preparation {
        table: "answers",
        create: r#"CREATE TABLE IF NOT EXISTS answers (
            id BIGSERIAL PRIMARY KEY,
            content TEXT NOT NULL,
            "imageUrl" TEXT NOT NULL DEFAULT '',
            quiz_id BIGINT NOT NULL
        )"#,
    },
];

/// Create every table that does not exist yet
pub async fn prepare(pool: &PgPool) -> Result<(), DatabaseError> {
    for preparation in PREPARATIONS {
        sqlx::query(preparation.create).execute(pool).await?;
    }
    info!("Prepared {} tables", PREPARATIONS.len());
    Ok(())
}

/// Drop every table, children first
pub async fn revert(pool: &PgPool) -> Result<(), DatabaseError> {
    for preparation in PREPARATIONS.iter().rev() {
        let sql = format!("DROP TABLE IF EXISTS {}", preparation.table);
        sqlx::query(&sql).execute(pool).await?;
        info!("Dropped table {}", preparation.table);
    }
    Ok(())
}
