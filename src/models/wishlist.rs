//! Wishlist model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Wishlist entry. Unique per (user_email, book_id), enforced by a compound
/// index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WishlistItem {
    pub user_email: String,
    pub book_id: Uuid,
    pub added_at: DateTime<Utc>,
}

/// Wishlist entry with the listing it references, for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WishlistEntry {
    pub user_email: String,
    pub book_id: Uuid,
    pub added_at: DateTime<Utc>,
    pub title: String,
    pub author: Option<String>,
    #[schema(value_type = String)]
    pub price: rust_decimal::Decimal,
    pub seller_email: String,
}

/// Add-to-wishlist request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddWishlistItem {
    pub book_id: Uuid,
}
