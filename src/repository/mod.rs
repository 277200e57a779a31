//! Repository layer for database operations

pub mod books;
pub mod orders;
pub mod payments;
pub mod users;
pub mod wishlist;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub wishlist: wishlist::WishlistRepository,
    pub orders: orders::OrdersRepository,
    pub payments: payments::PaymentsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            wishlist: wishlist::WishlistRepository::new(pool.clone()),
            orders: orders::OrdersRepository::new(pool.clone()),
            payments: payments::PaymentsRepository::new(pool.clone()),
            pool,
        }
    }
}
