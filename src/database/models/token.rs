use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Token {
    pub id: i64,
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub async fn insert(pool: &PgPool, user_id: i64, token: &str) -> Result<Token, DatabaseError> {
        let token = sqlx::query_as::<_, Token>(
            "INSERT INTO tokens (token, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(token)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(token)
    }

    /// Revoke a token by its literal value; returns whether a row was removed
    pub async fn delete_by_value(pool: &PgPool, token: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM tokens WHERE token = $1")
            .bind(token)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
