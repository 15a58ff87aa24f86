//! Registration and login endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{RegisterUser, User},
};

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful registration or login
#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Bearer token to send in the `Authorization` header
    pub token: String,
}

impl AuthResponse {
    fn new(token: String, user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }
    }
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Member registered", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    request.validate()?;

    let (token, user) = state.services.users.register(request).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse::new(token, user))))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse::new(token, user)))
}
