//! Authentication endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{Role, TokenRequest},
};

use super::AuthenticatedUser;

/// Issued token response
#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
}

/// Verified principal echo
#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub email: String,
    pub role: Role,
}

/// Issue a bearer token for a known user.
///
/// Only enabled when `auth.issue_dev_tokens` is set; production deployments
/// receive tokens from the external identity provider instead.
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 403, description = "Token issuing disabled"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn issue_token(
    State(state): State<crate::AppState>,
    Json(request): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = state.services.users.issue_dev_token(&request.email).await?;
    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
    }))
}

/// Return the verified principal for the presented token
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current principal", body = MeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(AuthenticatedUser(principal): AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        email: principal.email,
        role: principal.role,
    })
}
