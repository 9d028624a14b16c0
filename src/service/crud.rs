//! Generic CRUD orchestration: validate, check uniqueness, persist, shape the result.

use super::{Mode, Pagination, RequestValidator, ValidationPolicy};
use crate::error::AppError;
use crate::resource::{Payload, Resource};
use crate::store::Store;
use sqlx::SqlitePool;

/// Maximum number of ids accepted by one bulk delete.
pub const BULK_LIMIT: usize = 1000;

pub struct CrudService<R: Resource> {
    store: Store<R>,
    policy: ValidationPolicy,
}

impl<R: Resource> CrudService<R> {
    pub fn new(pool: SqlitePool, policy: ValidationPolicy) -> Self {
        CrudService {
            store: Store::new(pool),
            policy,
        }
    }

    /// Validate and insert. A taken email is rejected before the insert; the UNIQUE constraint
    /// covers the window between check and write.
    pub async fn create(&self, input: &R::Create) -> Result<R::Record, AppError> {
        let fields = input.fields();
        RequestValidator::validate(R::COLUMNS, &fields, Mode::Create, &self.policy)?;
        if let Some(email) = input.email() {
            self.ensure_email_free(email, None).await?;
        }
        let record = self.store.insert(&fields).await.map_err(|e| {
            tracing::warn!(resource = R::NAME, error = %e, "insert rejected");
            AppError::from(e)
        })?;
        tracing::info!(resource = R::NAME, id = R::id(&record), "created");
        Ok(record)
    }

    pub async fn read(&self, id: i64) -> Result<R::Record, AppError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound { entity: R::NAME, id })
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<R::Record>, AppError> {
        Ok(self.store.list(page.skip, page.limit).await?)
    }

    /// Apply a partial update. Omitted fields keep their stored value.
    pub async fn update(&self, id: i64, input: &R::Update) -> Result<R::Record, AppError> {
        let fields = input.fields();
        RequestValidator::validate(R::COLUMNS, &fields, Mode::Update, &self.policy)?;
        self.read(id).await?;
        if let Some(email) = input.email() {
            self.ensure_email_free(email, Some(id)).await?;
        }
        let record = self
            .store
            .update(id, &fields)
            .await
            .map_err(|e| {
                tracing::warn!(resource = R::NAME, id, error = %e, "update rejected");
                AppError::from(e)
            })?
            .ok_or(AppError::NotFound { entity: R::NAME, id })?;
        tracing::info!(resource = R::NAME, id, fields = fields.len(), "updated");
        Ok(record)
    }

    /// Delete and return the removed record.
    pub async fn delete(&self, id: i64) -> Result<R::Record, AppError> {
        let record = self.read(id).await?;
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound { entity: R::NAME, id });
        }
        tracing::info!(resource = R::NAME, id, "deleted");
        Ok(record)
    }

    /// Delete every listed id; unknown ids are skipped. Returns the number removed.
    pub async fn delete_many(&self, ids: &[i64]) -> Result<u64, AppError> {
        if ids.len() > BULK_LIMIT {
            return Err(AppError::BadRequest(format!(
                "bulk delete limited to {} ids",
                BULK_LIMIT
            )));
        }
        let removed = self.store.delete_many(ids).await?;
        tracing::info!(resource = R::NAME, requested = ids.len(), removed, "bulk deleted");
        Ok(removed)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        Ok(self.store.count().await?)
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<i64>) -> Result<(), AppError> {
        match self.store.get_by_email(email).await? {
            Some(existing) if Some(R::id(&existing)) != owner => {
                tracing::warn!(resource = R::NAME, email, "email already registered");
                Err(AppError::Duplicate(email.to_string()))
            }
            _ => Ok(()),
        }
    }
}
