//! Self-service profile endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        user::{UpdateProfile, User},
    },
};

use super::AuthenticatedUser;

/// Get own profile
#[utoipa::path(
    get,
    path = "/profile/me",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current member", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}

/// Update own profile (name, contact, address)
#[utoipa::path(
    put,
    path = "/profile/me",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(profile): Json<UpdateProfile>,
) -> AppResult<Json<User>> {
    let updated = state.services.users.update_profile(claims.user_id, profile).await?;
    Ok(Json(updated))
}

/// Books currently borrowed by the caller
#[utoipa::path(
    get,
    path = "/profile/me/borrowed",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books with an open loan for the caller", body = Vec<Book>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrowed_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.loans.borrowed_by(claims.user_id).await?;
    Ok(Json(books))
}
