use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_AUTHORITY_LIST_LIMIT, MAX_LIST_LIMIT};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

/// `?limit=` query for "most recent N" listings
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct LimitQuery {
    /// Number of rows to return (default: 20, max: 100)
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_AUTHORITY_LIST_LIMIT
}

impl Default for LimitQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_AUTHORITY_LIST_LIMIT,
        }
    }
}

impl LimitQuery {
    /// Limit clamped to `1..=MAX_LIST_LIMIT`
    pub fn clamped(&self) -> i64 {
        self.limit.clamp(1, MAX_LIST_LIMIT)
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}
