//! Book listing endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, OwnedBookQuery, UpdateBook},
};

use super::AuthenticatedUser;

/// Public catalog: public listings only, no authentication
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Public listings", body = Vec<Book>)
    )
)]
pub async fn list_public(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_public(&query).await?;
    Ok(Json(books))
}

/// Create a listing (librarian only)
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Listing created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    book.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.books.create(&principal, &book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List books in the caller's owner scope (librarian own / admin any)
#[utoipa::path(
    get,
    path = "/allbooks",
    tag = "books",
    security(("bearer_auth" = [])),
    params(OwnedBookQuery),
    responses(
        (status = 200, description = "Listings in scope", body = Vec<Book>),
        (status = 403, description = "Outside the caller's scope")
    )
)]
pub async fn list_owned(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<OwnedBookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_owned(&principal, &query).await?;
    Ok(Json(books))
}

/// Get one listing in the caller's owner scope
#[utoipa::path(
    get,
    path = "/allbooks/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Listing", body = Book),
        (status = 403, description = "Outside the caller's scope"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_owned(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_owned(&principal, id).await?;
    Ok(Json(book))
}

/// Update a listing (selling librarian or admin)
#[utoipa::path(
    patch,
    path = "/allbooks/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Listing updated", body = Book),
        (status = 403, description = "Not the selling librarian"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(changes): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    changes
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let book = state.services.books.update(&principal, id, &changes).await?;
    Ok(Json(book))
}

/// Delete a listing (admin only). Every wishlist entry referencing the book
/// is deleted with it.
#[utoipa::path(
    delete,
    path = "/allbooks/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.books.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
