//! Authentication middleware for Axum
//!
//! `auth_middleware` turns a bearer JWT into an [`AuthenticatedUser`] request
//! extension; `require_staff` must run after it on staff-only routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::identity::Caller;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiResponse;

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    StaffOnly,
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// The resolved principal, available to handlers as `Extension<AuthenticatedUser>`.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub caller: Caller,
    pub username: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            caller: claims.caller(),
            username: claims.username,
        }
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            auth_error_response(AuthError::InvalidToken)
        }
    }
}

/// Rejects non-staff callers with 403.
pub async fn require_staff(request: Request<Body>, next: Next) -> Response {
    let is_staff = request
        .extensions()
        .get::<AuthenticatedUser>()
        .is_some_and(|u| u.caller.is_staff());

    if !is_staff {
        return auth_error_response(AuthError::StaffOnly);
    }
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
        AuthError::StaffOnly => (StatusCode::FORBIDDEN, "Administrator access required"),
    };
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}
