//! Books repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook, Visibility},
    services::authz::BookScope,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// List the public catalog. The visibility filter is part of the query,
    /// never applied after the fact.
    pub async fn list_public(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut sql = String::from("SELECT * FROM books WHERE visibility = $1");
        if query.category.is_some() {
            sql.push_str(" AND category = $2");
        }
        if query.author.is_some() {
            let n = if query.category.is_some() { 3 } else { 2 };
            sql.push_str(&format!(" AND author ILIKE ${}", n));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, Book>(&sql).bind(Visibility::Public);
        if let Some(ref category) = query.category {
            q = q.bind(category);
        }
        if let Some(ref author) = query.author {
            q = q.bind(format!("%{}%", author));
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// List books within the caller's scope, newest first
    pub async fn list_scoped(&self, scope: &BookScope) -> AppResult<Vec<Book>> {
        let books = match scope {
            BookScope::All => {
                sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
            BookScope::Seller(email) => {
                sqlx::query_as::<_, Book>(
                    "SELECT * FROM books WHERE LOWER(seller_email) = LOWER($1) ORDER BY created_at DESC",
                )
                .bind(email)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(books)
    }

    /// Create a new listing
    pub async fn create(
        &self,
        book: &CreateBook,
        seller_email: &str,
        seller_name: Option<&str>,
    ) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books
                (id, title, author, category, description, cover_url, condition,
                 price, visibility, seller_email, seller_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, LOWER($10), $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(&book.description)
        .bind(&book.cover_url)
        .bind(&book.condition)
        .bind(book.price)
        .bind(book.visibility.unwrap_or(Visibility::Public))
        .bind(seller_email)
        .bind(seller_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a listing, keeping any field the request leaves unset
    pub async fn update(&self, id: Uuid, changes: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title       = COALESCE($2, title),
                author      = COALESCE($3, author),
                category    = COALESCE($4, category),
                description = COALESCE($5, description),
                cover_url   = COALESCE($6, cover_url),
                condition   = COALESCE($7, condition),
                price       = COALESCE($8, price),
                visibility  = COALESCE($9, visibility)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.author)
        .bind(&changes.category)
        .bind(&changes.description)
        .bind(&changes.cover_url)
        .bind(&changes.condition)
        .bind(changes.price)
        .bind(changes.visibility)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Delete a listing together with every wishlist entry referencing it.
    /// The cascade runs in one transaction so a failure leaves both tables
    /// untouched.
    pub async fn delete_cascade(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM wishlist WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
