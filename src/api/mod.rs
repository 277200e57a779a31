//! API handlers for Boimela REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;
pub mod orders;
pub mod payments;
pub mod users;
pub mod wishlist;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    error::AppError,
    models::user::{Principal, UserClaims},
    AppState,
};

/// Extractor for the authenticated principal. Identity comes only from the
/// verified bearer token; the role is read from the user record on every
/// request, so a role change takes effect without re-issuing tokens.
pub struct AuthenticatedUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        // The token only identifies the account; authority comes from the
        // stored role at request time
        let user = state
            .services
            .users
            .get_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Authentication("Unknown principal".to_string()))?;

        Ok(AuthenticatedUser(Principal::from_user(&user)))
    }
}
