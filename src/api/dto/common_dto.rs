//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};

/// Skip/limit pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Rows to skip. Defaults to 0.
    #[serde(default)]
    pub skip: i64,
    /// Rows to return (max 100). Defaults to 20.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

impl PaginationParams {
    /// Clamps `skip` to non-negative and `limit` to 1..=100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            skip: self.skip.max(0),
            limit: self.limit.clamp(1, 100),
        }
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PaginationMeta {
    /// Rows skipped.
    pub skip: i64,
    /// Rows requested.
    pub limit: i64,
    /// Total matching rows.
    pub total: i64,
    /// Whether another page exists past this one.
    pub has_more: bool,
}

impl PaginationMeta {
    /// Builds the metadata from clamped parameters and the total count.
    #[must_use]
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        Self {
            skip: params.skip,
            limit: params.limit,
            total,
            has_more: params.skip + params.limit < total,
        }
    }
}

/// Generic message envelope for operations with nothing else to return.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamping_bounds_skip_and_limit() {
        let params = PaginationParams {
            skip: -5,
            limit: 1000,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.skip, 0);
        assert_eq!(clamped.limit, 100);
    }

    #[test]
    fn has_more_reflects_remaining_rows() {
        let params = PaginationParams { skip: 0, limit: 20 };
        assert!(PaginationMeta::new(&params, 21).has_more);
        assert!(!PaginationMeta::new(&params, 20).has_more);

        let last_page = PaginationParams { skip: 40, limit: 20 };
        assert!(!PaginationMeta::new(&last_page, 45).has_more);
    }
}
