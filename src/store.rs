//! Connection pool setup and row-level operations over one resource table.
//!
//! Every call acquires its own pooled connection and hands it back on drop, so nothing is
//! held across requests. Each write is one statement, so no call holds a read lock while
//! waiting to upgrade it.

use crate::error::StoreError;
use crate::resource::{Resource, EMAIL_COLUMN};
use crate::sql::{self, FieldValue, QueryBuf};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use std::marker::PhantomData;
use std::str::FromStr;
use std::time::Duration;

/// How long a writer waits on another connection's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a pool for `database_url`, creating the database file if needed.
///
/// In-memory databases live only as long as their connection, so they get exactly one
/// connection that is never recycled. File databases run in WAL mode so readers never block
/// the writer.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(BUSY_TIMEOUT);
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let (options, pool_options) = if in_memory {
        let pool_options = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
        (options, pool_options)
    } else {
        let options = options.journal_mode(SqliteJournalMode::Wal);
        (options, SqlitePoolOptions::new().max_connections(max_connections))
    };
    let pool = pool_options.connect_with(options).await?;
    tracing::debug!(url = %database_url, in_memory, "database pool ready");
    Ok(pool)
}

/// Persistence handle for resource `R`. Cheap to clone; the pool is shared.
pub struct Store<R: Resource> {
    pool: SqlitePool,
    _resource: PhantomData<R>,
}

impl<R: Resource> Clone for Store<R> {
    fn clone(&self) -> Self {
        Store::new(self.pool.clone())
    }
}

impl<R: Resource> Store<R> {
    pub fn new(pool: SqlitePool) -> Self {
        Store {
            pool,
            _resource: PhantomData,
        }
    }

    /// Insert a row; assigns id and timestamps. A taken email yields [`StoreError::Duplicate`].
    pub async fn insert(&self, fields: &[(&'static str, FieldValue)]) -> Result<R::Record, StoreError> {
        let q = sql::insert::<R>(fields, FieldValue::Timestamp(Utc::now()));
        let mut conn = self.pool.acquire().await?;
        let row = fetch_optional::<R>(&mut conn, &q)
            .await
            .map_err(|e| map_unique_violation(e, fields))?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        Ok(row)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<R::Record>, StoreError> {
        let q = sql::select_by_id::<R>(id);
        let mut conn = self.pool.acquire().await?;
        Ok(fetch_optional::<R>(&mut conn, &q).await?)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<R::Record>, StoreError> {
        let q = sql::select_by_email::<R>(email);
        let mut conn = self.pool.acquire().await?;
        Ok(fetch_optional::<R>(&mut conn, &q).await?)
    }

    /// Page of rows ordered by id ascending.
    pub async fn list(&self, offset: u64, limit: u32) -> Result<Vec<R::Record>, StoreError> {
        let q = sql::select_list::<R>(offset, limit);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut conn = self.pool.acquire().await?;
        let mut query = sqlx::query_as::<_, R::Record>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_all(&mut *conn).await?)
    }

    /// Apply only the supplied fields. Returns None when the id does not exist.
    ///
    /// The write is a single `UPDATE .. RETURNING` statement; a new email that another row
    /// already holds fails the UNIQUE constraint and comes back as [`StoreError::Duplicate`].
    pub async fn update(
        &self,
        id: i64,
        fields: &[(&'static str, FieldValue)],
    ) -> Result<Option<R::Record>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        match sql::update::<R>(id, fields, FieldValue::Timestamp(Utc::now())) {
            Some(q) => fetch_optional::<R>(&mut conn, &q)
                .await
                .map_err(|e| map_unique_violation(e, fields)),
            None => Ok(fetch_optional::<R>(&mut conn, &sql::select_by_id::<R>(id)).await?),
        }
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let q = sql::delete::<R>(id);
        let mut conn = self.pool.acquire().await?;
        Ok(execute(&mut conn, &q).await? > 0)
    }

    /// Remove every listed id in one statement; returns how many rows actually went away.
    pub async fn delete_many(&self, ids: &[i64]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let q = sql::delete_in::<R>(ids);
        let mut conn = self.pool.acquire().await?;
        Ok(execute(&mut conn, &q).await?)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let q = sql::count::<R>();
        tracing::debug!(sql = %q.sql, "query");
        let mut conn = self.pool.acquire().await?;
        Ok(sqlx::query_scalar::<_, i64>(&q.sql).fetch_one(&mut *conn).await?)
    }
}

async fn fetch_optional<R: Resource>(
    conn: &mut SqliteConnection,
    q: &QueryBuf,
) -> Result<Option<R::Record>, sqlx::Error> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, R::Record>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query.fetch_optional(conn).await
}

async fn execute(conn: &mut SqliteConnection, q: &QueryBuf) -> Result<u64, sqlx::Error> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.execute(conn).await?.rows_affected())
}

fn map_unique_violation(err: sqlx::Error, fields: &[(&'static str, FieldValue)]) -> StoreError {
    let is_unique = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
    if !is_unique {
        return StoreError::Database(err);
    }
    let value = fields
        .iter()
        .find(|(name, _)| *name == EMAIL_COLUMN)
        .and_then(|(_, v)| v.as_text())
        .unwrap_or_default()
        .to_string();
    StoreError::Duplicate {
        field: EMAIL_COLUMN,
        value,
    }
}
