//! Wishlist service. Strictly owner-only: the engine grants no admin
//! override here.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::user::Principal,
    models::wishlist::{WishlistEntry, WishlistItem},
    repository::Repository,
    services::authz::{self, Action},
};

#[derive(Clone)]
pub struct WishlistService {
    repository: Repository,
}

impl WishlistService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List the principal's wishlist
    pub async fn list(&self, principal: &Principal) -> AppResult<Vec<WishlistEntry>> {
        authz::authorize(principal, &Action::TouchWishlist { owner: &principal.email })
            .into_result()?;
        self.repository.wishlist.list_for(&principal.email).await
    }

    /// Add a book to the principal's wishlist. Adding an already-wished book
    /// is absorbed by the compound key and treated as success.
    pub async fn add(&self, principal: &Principal, book_id: Uuid) -> AppResult<WishlistItem> {
        authz::authorize(principal, &Action::TouchWishlist { owner: &principal.email })
            .into_result()?;

        let book = self
            .repository
            .books
            .get_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))?;

        match self.repository.wishlist.add(&principal.email, book.id).await? {
            Some(item) => Ok(item),
            // Lost the insert to an existing row; return that row as stored
            None => self
                .repository
                .wishlist
                .get(&principal.email, book.id)
                .await?
                .ok_or_else(|| {
                    AppError::Internal("Wishlist row vanished after conflict".to_string())
                }),
        }
    }

    /// Remove a book from the principal's wishlist
    pub async fn remove(&self, principal: &Principal, book_id: Uuid) -> AppResult<()> {
        authz::authorize(principal, &Action::TouchWishlist { owner: &principal.email })
            .into_result()?;

        if self.repository.wishlist.remove(&principal.email, book_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Book {} is not on the wishlist",
                book_id
            )))
        }
    }
}
