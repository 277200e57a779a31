//! Business logic services

pub mod authz;
pub mod books;
pub mod orders;
pub mod payments;
pub mod provider;
pub mod users;
pub mod wishlist;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, PaymentConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub wishlist: wishlist::WishlistService,
    pub orders: orders::OrdersService,
    pub payments: payments::PaymentsService,
}

impl Services {
    /// Create all services with the given repository and provider handle
    pub fn new(
        repository: Repository,
        provider: Arc<dyn provider::PaymentProvider>,
        auth_config: AuthConfig,
        payment_config: PaymentConfig,
    ) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            books: books::BooksService::new(repository.clone()),
            wishlist: wishlist::WishlistService::new(repository.clone()),
            orders: orders::OrdersService::new(repository.clone()),
            payments: payments::PaymentsService::new(repository, provider, payment_config),
        }
    }
}
