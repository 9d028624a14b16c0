//! Resource CRUD handlers: create, read, update, delete, list, bulk delete.
//!
//! Every handler is generic over [`Resource`] and is mounted once per resource.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::resource::Resource;
use crate::response::{deleted_body, BulkDeleted, TOTAL_COUNT_HEADER};
use crate::service::Pagination;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header::HeaderName, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::collections::HashMap;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let page = Pagination::from_query(&params, R::DEFAULT_PAGE_SIZE, state.config.max_page_size)?;
    let service = state.service::<R>();
    let rows = service.list(page).await?;
    let total = service.count().await?;
    Ok((
        [(HeaderName::from_static(TOTAL_COUNT_HEADER), total.to_string())],
        Json(rows),
    ))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<R::Create>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.service::<R>().create(&body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn read<R: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state.service::<R>().read(id).await?;
    Ok(Json(row))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody<R::Update>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state.service::<R>().update(id, &body).await?;
    Ok(Json(row))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state.service::<R>().delete(id).await?;
    Ok(Json(deleted_body(R::NAME, R::summary(&row))))
}

pub async fn bulk_delete<R: Resource>(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<BulkDeleteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.service::<R>().delete_many(&body.ids).await?;
    Ok(Json(BulkDeleted { deleted }))
}
