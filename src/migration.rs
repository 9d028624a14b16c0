//! Create resource tables and their indexes. Idempotent: safe to run on every startup.

use crate::resource::{Employees, Resource, Users};
use crate::sql;
use sqlx::SqlitePool;

/// Ensure the table for one resource exists.
pub async fn ensure_table<R: Resource>(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for ddl in sql::create_table::<R>() {
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(table = R::TABLE, "table ready");
    Ok(())
}

/// Ensure every built-in resource table exists.
pub async fn apply_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    ensure_table::<Users>(pool).await?;
    ensure_table::<Employees>(pool).await?;
    Ok(())
}
