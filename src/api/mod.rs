//! API handlers for the bookshelf REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;
pub mod profile;
pub mod stats;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::user::UserClaims,
    AppState,
};

/// Extractor for the authenticated member from the bearer token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = bearer_token(header)?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
fn bearer_token(header: Option<&str>) -> AppResult<&str> {
    let header = header
        .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))
}

/// Plain message response
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert!(matches!(bearer_token(None), Err(AppError::Authentication(_))));
        assert!(matches!(bearer_token(Some("Basic abc")), Err(AppError::Authentication(_))));
        assert!(matches!(bearer_token(Some("Bearer   ")), Err(AppError::Authentication(_))));
    }
}
