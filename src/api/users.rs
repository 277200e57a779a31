//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{SignupRequest, UpdateUserRole, User},
};

use super::AuthenticatedUser;

/// Sign up a user. Open endpoint; idempotent on email, so a duplicate signup
/// returns the existing account.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created or already present", body = User),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.services.users.signup(&request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list_users(&principal).await?;
    Ok(Json(users))
}

/// Update a user's role (admin only)
#[utoipa::path(
    patch,
    path = "/users/{email}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("email" = String, Path, description = "User email")
    ),
    request_body = UpdateUserRole,
    responses(
        (status = 200, description = "Role updated", body = User),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_role(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(email): Path<String>,
    Json(request): Json<UpdateUserRole>,
) -> AppResult<Json<User>> {
    let user = state
        .services
        .users
        .update_role(&principal, &email, request.role)
        .await?;
    Ok(Json(user))
}
