use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::{app_state::AppState, error::error_response};

/// Proof that the request may call admin operations.
///
/// With no `ADMIN_TOKEN` configured every request passes; otherwise the
/// request must carry `Authorization: Bearer <ADMIN_TOKEN>`.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AccessError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token.as_deref() else {
            return Ok(AdminAccess);
        };

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AccessError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AccessError::InvalidTokenFormat)?;

        if constant_time_eq(token.trim().as_bytes(), expected.as_bytes()) {
            Ok(AdminAccess)
        } else {
            Err(AccessError::InvalidToken)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    MissingToken,
    InvalidTokenFormat,
    InvalidToken,
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let message = match self {
            AccessError::MissingToken => "Missing authorization token",
            AccessError::InvalidTokenFormat => "Invalid token format",
            AccessError::InvalidToken => "Invalid admin token",
        };
        error_response(StatusCode::UNAUTHORIZED, message)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
