//! Data models for Boimela

pub mod book;
pub mod order;
pub mod user;
pub mod wishlist;

// Re-export commonly used types
pub use book::{Book, Visibility};
pub use order::{Order, OrderStatus, PaymentRecord, PaymentStatus};
pub use user::{Principal, Role, User, UserClaims};
pub use wishlist::WishlistItem;
