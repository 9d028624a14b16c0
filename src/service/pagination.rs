//! `skip` / `limit` query parameters.

use crate::error::AppError;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u32,
}

impl Pagination {
    /// Parse `skip` (default 0, must be >= 0) and `limit` (default per resource, must be >= 1,
    /// clamped to `max_limit`). Other keys are ignored.
    pub fn from_query(
        params: &HashMap<String, String>,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<Self, AppError> {
        let skip = match params.get("skip") {
            None => 0,
            Some(raw) => {
                let n = parse_int("skip", raw)?;
                u64::try_from(n).map_err(|_| AppError::BadRequest("skip must be >= 0".into()))?
            }
        };
        let limit = match params.get("limit") {
            None => default_limit,
            Some(raw) => {
                let n = parse_int("limit", raw)?;
                if n < 1 {
                    return Err(AppError::BadRequest("limit must be >= 1".into()));
                }
                u32::try_from(n).unwrap_or(u32::MAX)
            }
        };
        Ok(Pagination {
            skip,
            limit: limit.min(max_limit),
        })
    }
}

fn parse_int(key: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be an integer", key)))
}
