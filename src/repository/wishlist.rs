//! Wishlist repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::wishlist::{WishlistEntry, WishlistItem},
};

#[derive(Clone)]
pub struct WishlistRepository {
    pool: Pool<Postgres>,
}

impl WishlistRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List a user's wishlist with the referenced listings, newest first
    pub async fn list_for(&self, user_email: &str) -> AppResult<Vec<WishlistEntry>> {
        let entries = sqlx::query_as::<_, WishlistEntry>(
            r#"
            SELECT w.user_email, w.book_id, w.added_at,
                   b.title, b.author, b.price, b.seller_email
            FROM wishlist w
            JOIN books b ON b.id = w.book_id
            WHERE LOWER(w.user_email) = LOWER($1)
            ORDER BY w.added_at DESC
            "#,
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Add a book to a user's wishlist. Returns the stored row; adding the
    /// same book twice is absorbed by the compound key.
    pub async fn add(&self, user_email: &str, book_id: Uuid) -> AppResult<Option<WishlistItem>> {
        let inserted = sqlx::query_as::<_, WishlistItem>(
            r#"
            INSERT INTO wishlist (user_email, book_id)
            VALUES (LOWER($1), $2)
            ON CONFLICT (user_email, book_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_email)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Look up a single wishlist row
    pub async fn get(&self, user_email: &str, book_id: Uuid) -> AppResult<Option<WishlistItem>> {
        let item = sqlx::query_as::<_, WishlistItem>(
            "SELECT * FROM wishlist WHERE LOWER(user_email) = LOWER($1) AND book_id = $2",
        )
        .bind(user_email)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Remove a book from a user's wishlist. Returns whether a row existed.
    pub async fn remove(&self, user_email: &str, book_id: Uuid) -> AppResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM wishlist WHERE LOWER(user_email) = LOWER($1) AND book_id = $2",
        )
        .bind(user_email)
        .bind(book_id)
        .execute(&self.pool)
        .await?;

        Ok(deleted.rows_affected() > 0)
    }
}
