//! Mapping of domain errors onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::shared::DomainError;

pub type ApiResult<T> = Result<T, DomainError>;

pub fn status_of(e: &DomainError) -> StatusCode {
    match e {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = status_of(&self);
        let message = if self.is_infrastructure() {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_map_to_client_statuses() {
        assert_eq!(status_of(&DomainError::validation("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(&DomainError::forbidden("x")), StatusCode::FORBIDDEN);
        assert_eq!(status_of(&DomainError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(&DomainError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            status_of(&DomainError::Unauthorized("x".into())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn storage_errors_hide_details() {
        let response = DomainError::Storage("disk I/O error".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
