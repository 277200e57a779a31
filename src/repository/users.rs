//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{Role, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create a user unless the email is already taken, and return the row
    /// that ended up in the table. The unique key on email makes concurrent
    /// duplicate signups collapse to a single row without a read-then-insert
    /// race.
    pub async fn create_if_absent(&self, email: &str, name: Option<&str>) -> AppResult<User> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, role)
            VALUES (LOWER($1), $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(Role::Buyer)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(user) => Ok(user),
            None => self
                .get_by_email(email)
                .await?
                .ok_or_else(|| AppError::Internal("Signup lost both insert and lookup".to_string())),
        }
    }

    /// List all users, newest first
    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Update a user's role
    pub async fn update_role(&self, email: &str, role: Role) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2 WHERE LOWER(email) = LOWER($1) RETURNING *",
        )
        .bind(email)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", email)))
    }
}
