//! Book listing service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, OwnedBookQuery, UpdateBook},
    models::user::Principal,
    repository::Repository,
    services::authz::{self, Action, BookScope},
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Public catalog: only public listings, no authentication
    pub async fn list_public(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list_public(query).await
    }

    /// Owner-scoped listing view: admin sees every listing, a librarian only
    /// their own, regardless of the filter they asked for
    pub async fn list_owned(
        &self,
        principal: &Principal,
        query: &OwnedBookQuery,
    ) -> AppResult<Vec<Book>> {
        authz::authorize(
            principal,
            &Action::ListAllBooks { owner: query.email.as_deref() },
        )
        .into_result()?;

        let scope = match authz::book_scope(principal) {
            BookScope::All => match &query.email {
                Some(email) => BookScope::Seller(email.clone()),
                None => BookScope::All,
            },
            scoped => scoped,
        };

        self.repository.books.list_scoped(&scope).await
    }

    /// Fetch one listing within the caller's owner scope
    pub async fn get_owned(&self, principal: &Principal, id: Uuid) -> AppResult<Book> {
        let book = self
            .repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        authz::authorize(
            principal,
            &Action::ListAllBooks { owner: Some(&book.seller_email) },
        )
        .into_result()?;

        Ok(book)
    }

    /// Create a listing. Seller identity is the verified principal.
    pub async fn create(&self, principal: &Principal, book: &CreateBook) -> AppResult<Book> {
        authz::authorize(principal, &Action::CreateBook).into_result()?;

        let seller = self.repository.users.get_by_email(&principal.email).await?;
        let seller_name = seller.and_then(|u| u.name);

        self.repository
            .books
            .create(book, &principal.email, seller_name.as_deref())
            .await
    }

    /// Update a listing: selling librarian or admin
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: &UpdateBook,
    ) -> AppResult<Book> {
        let book = self
            .repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        authz::authorize(principal, &Action::UpdateBook { seller: &book.seller_email })
            .into_result()?;

        self.repository.books.update(id, changes).await
    }

    /// Delete a listing (admin only), cascading its wishlist entries
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        authz::authorize(principal, &Action::DeleteBook).into_result()?;
        self.repository.books.delete_cascade(id).await
    }
}
