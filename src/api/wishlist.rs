//! Wishlist endpoints (owner-only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::wishlist::{AddWishlistItem, WishlistEntry, WishlistItem},
};

use super::AuthenticatedUser;

/// List the caller's wishlist
#[utoipa::path(
    get,
    path = "/wishlist",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wishlist entries", body = Vec<WishlistEntry>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_wishlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> AppResult<Json<Vec<WishlistEntry>>> {
    let entries = state.services.wishlist.list(&principal).await?;
    Ok(Json(entries))
}

/// Add a book to the caller's wishlist. Re-adding is a no-op success.
#[utoipa::path(
    post,
    path = "/wishlist",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    request_body = AddWishlistItem,
    responses(
        (status = 201, description = "Entry present", body = WishlistItem),
        (status = 404, description = "Book not found")
    )
)]
pub async fn add_to_wishlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(request): Json<AddWishlistItem>,
) -> AppResult<(StatusCode, Json<WishlistItem>)> {
    let item = state.services.wishlist.add(&principal, request.book_id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Remove a book from the caller's wishlist
#[utoipa::path(
    delete,
    path = "/wishlist/{book_id}",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn remove_from_wishlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(book_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.wishlist.remove(&principal, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
