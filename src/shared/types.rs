use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::MAX_LIST_LIMIT;

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

impl<T> ApiResponse<T> {
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

// =============================================================================
// LIST LIMIT
// =============================================================================

/// Optional cap on the number of items a list endpoint returns.
/// Without `limit` every item is returned.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// Maximum number of items to return (1-100)
    #[param(minimum = 1, maximum = 100)]
    pub limit: Option<i64>,
}

impl LimitQuery {
    /// Clamped limit, `None` when unbounded
    pub fn limit(&self) -> Option<i64> {
        self.limit.map(|l| l.clamp(1, MAX_LIST_LIMIT))
    }
}
