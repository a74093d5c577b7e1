//! Shared HTTP building blocks: the response envelope, error mapping and the
//! validating JSON extractor.

pub mod error;
pub mod validated_json;

use serde::Serialize;
use utoipa::ToSchema;

use crate::shared::{PageInfo, PaginatedResult};

pub use error::ApiResult;
pub use validated_json::ValidatedJson;

/// Envelope used by every JSON endpoint except the bare reservation views.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Page metadata as serialized next to list data.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl From<PageInfo> for PaginationMeta {
    fn from(p: PageInfo) -> Self {
        Self {
            page: p.page,
            limit: p.limit,
            total: p.total,
            total_pages: p.total_pages,
        }
    }
}

/// `{data, pagination}`
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn from_result<S>(result: PaginatedResult<S>, f: impl FnMut(S) -> T) -> Self {
        let result = result.map(f);
        Self {
            data: result.items,
            pagination: result.pagination.into(),
        }
    }
}
