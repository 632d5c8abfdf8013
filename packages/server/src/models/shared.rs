use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Success envelope for mutations: a symbolic token plus the id of a created row.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ActionResponse {
    #[schema(example = "FISH_REGISTER_SUCCESS")]
    pub result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 42)]
    pub data: Option<i32>,
}

impl ActionResponse {
    pub fn done(result: &'static str) -> Self {
        Self { result, data: None }
    }

    pub fn created(result: &'static str, id: i32) -> Self {
        Self {
            result,
            data: Some(id),
        }
    }
}

/// Success envelope wrapping a single payload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ItemResponse<T> {
    pub result: T,
}

/// Success envelope wrapping a list, with the unwindowed match count where the
/// endpoint reports one.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ListResponse<T> {
    pub result: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl<T> ListResponse<T> {
    pub fn new(result: Vec<T>) -> Self {
        Self {
            result,
            total_count: None,
        }
    }

    pub fn counted(result: Vec<T>, total_count: u64) -> Self {
        Self {
            result,
            total_count: Some(total_count),
        }
    }
}

/// Success envelope for a bare number (counts, deleted rows).
#[derive(Serialize, utoipa::ToSchema)]
pub struct CountResponse {
    #[schema(example = 3)]
    pub result: u64,
}

/// Optional result window. An absent `limit` means no limit.
#[derive(Deserialize, Default, utoipa::IntoParams)]
pub struct WindowQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Public identity of a user as embedded in other responses.
#[derive(Serialize, Clone, Debug, PartialEq, utoipa::ToSchema)]
pub struct UserSummary {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "pike_hunter")]
    pub username: String,
    pub nickname: Option<String>,
    pub style: Option<String>,
    pub level: Option<i32>,
    pub avatar: Option<String>,
}

impl UserSummary {
    /// Stand-in for a user row that could not be loaded.
    pub fn unknown(id: i32) -> Self {
        Self {
            id,
            username: String::new(),
            nickname: None,
            style: None,
            level: None,
            avatar: None,
        }
    }
}

/// Reject a zero limit; `None` is the unbounded window.
pub fn validate_limit(limit: Option<u64>) -> Result<(), AppError> {
    if limit == Some(0) {
        return Err(AppError::Rejected("QUERY.INVALID_LIMIT"));
    }
    Ok(())
}

/// Trimmed text must be 1..=`max` characters.
pub fn validate_text(value: &str, max: usize, token: &'static str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Rejected(token));
    }
    Ok(())
}

/// Widths are finite and non-negative.
pub fn validate_width(width: f64, token: &'static str) -> Result<(), AppError> {
    if !width.is_finite() || width < 0.0 {
        return Err(AppError::Rejected(token));
    }
    Ok(())
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
