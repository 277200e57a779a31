//! Boimela Used-Book Marketplace
//!
//! REST JSON API for a used-book exchange: user accounts and roles, book
//! listings, wishlists, orders, and payment capture through a hosted-checkout
//! payment provider.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
