use std::marker::PhantomData;

use sqlx::PgPool;

use crate::database::manager::{quote_identifier, DatabaseError};
use crate::database::record::Resource;

/// CRUD access to one resource table
pub struct Repository<'a, T> {
    pool: &'a PgPool,
    _phantom: PhantomData<T>,
}

impl<'a, T: Resource> Repository<'a, T> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    fn table() -> String {
        quote_identifier(T::TABLE)
    }

    pub async fn select_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", Self::table());
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(self.pool).await?;
        Ok(rows)
    }

    /// Rows whose `column` equals `value`, e.g. the answers of one quiz
    pub async fn select_by(&self, column: &str, value: i64) -> Result<Vec<T>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = $1 ORDER BY id",
            Self::table(),
            quote_identifier(column)
        );
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", Self::table());
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: i64) -> Result<T, DatabaseError> {
        self.select_one(id).await?.ok_or_else(|| not_found::<T>(id))
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", Self::table());
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// Insert a new row and return it with its generated id
    pub async fn insert(&self, record: &T) -> Result<T, DatabaseError> {
        let columns: Vec<String> = T::COLUMNS.iter().map(|c| quote_identifier(c)).collect();
        let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            Self::table(),
            columns.join(", "),
            placeholders.join(", ")
        );

        let row = record
            .bind_columns(sqlx::query_as::<_, T>(&sql))
            .fetch_one(self.pool)
            .await?;
        Ok(row)
    }

    /// Write every mutable column of an existing row
    pub async fn save(&self, record: &T) -> Result<T, DatabaseError> {
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ${}", quote_identifier(c), i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING *",
            Self::table(),
            assignments.join(", "),
            T::COLUMNS.len() + 1
        );

        let row = record
            .bind_columns(sqlx::query_as::<_, T>(&sql))
            .bind(record.id())
            .fetch_optional(self.pool)
            .await?;
        row.ok_or_else(|| not_found::<T>(record.id()))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", Self::table());
        let result = sqlx::query(&sql).bind(id).execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<T>(id));
        }
        Ok(())
    }

    /// Delete every row; returns how many were removed
    pub async fn clear(&self) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {}", Self::table());
        let result = sqlx::query(&sql).execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn not_found<T: Resource>(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("{} {} not found", T::NAME, id))
}
