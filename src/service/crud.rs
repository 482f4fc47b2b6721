//! Statement execution against SQLite for built queries.

use crate::error::AppError;
use crate::sql::QueryBuf;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{FromRow, SqlitePool};

pub struct CrudService;

impl CrudService {
    /// All rows of a SELECT (or RETURNING) statement.
    pub async fn fetch_all<T>(pool: &SqlitePool, q: &QueryBuf) -> Result<Vec<T>, AppError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<Sqlite, T>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_all(pool).await?)
    }

    /// First row, or None.
    pub async fn fetch_optional<T>(pool: &SqlitePool, q: &QueryBuf) -> Result<Option<T>, AppError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<Sqlite, T>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_optional(pool).await?)
    }

    /// Single integer result (COUNT, SUM).
    pub async fn scalar(pool: &SqlitePool, q: &QueryBuf) -> Result<i64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<Sqlite, i64>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_one(pool).await?)
    }

    /// Execute and return the number of affected rows.
    pub async fn execute(pool: &SqlitePool, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let mut query = sqlx::query::<Sqlite>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.execute(pool).await?.rows_affected())
    }
}
