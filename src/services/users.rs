//! User account service

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Principal, Role, SignupRequest, User, UserClaims},
    repository::Repository,
    services::authz::{self, Action},
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Sign up a user, or return the existing account for the email. The
    /// unique email index makes this idempotent under concurrent signups.
    pub async fn signup(&self, request: &SignupRequest) -> AppResult<User> {
        self.repository
            .users
            .create_if_absent(&request.email, request.name.as_deref())
            .await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repository.users.get_by_email(email).await
    }

    /// List all users (admin only)
    pub async fn list_users(&self, principal: &Principal) -> AppResult<Vec<User>> {
        authz::authorize(principal, &Action::ListAllUsers).into_result()?;
        self.repository.users.list_all().await
    }

    /// Update a user's role (admin only)
    pub async fn update_role(
        &self,
        principal: &Principal,
        email: &str,
        role: Role,
    ) -> AppResult<User> {
        authz::authorize(principal, &Action::UpdateUserRole).into_result()?;
        self.repository.users.update_role(email, role).await
    }

    /// Issue a bearer token for a known user. Disabled outside development.
    pub async fn issue_dev_token(&self, email: &str) -> AppResult<String> {
        if !self.config.issue_dev_tokens {
            return Err(AppError::Authorization(
                "Token issuing is disabled".to_string(),
            ));
        }

        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", email)))?;

        let claims = UserClaims::for_user(&user, self.config.jwt_expiration_hours);
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}
