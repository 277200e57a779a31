//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, orders, payments, users, wishlist};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Boimela API",
        version = "0.1.0",
        description = "Used-book marketplace REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::issue_token,
        auth::me,
        // Users
        users::signup,
        users::list_users,
        users::update_role,
        // Books
        books::list_public,
        books::create_book,
        books::list_owned,
        books::get_owned,
        books::update_book,
        books::delete_book,
        // Wishlist
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
        // Orders
        orders::list_orders,
        orders::create_order,
        orders::update_order,
        orders::list_invoices,
        // Payments
        payments::create_checkout_session,
        payments::payment_success,
    ),
    components(
        schemas(
            // Auth
            auth::TokenResponse,
            auth::MeResponse,
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::SignupRequest,
            crate::models::user::UpdateUserRole,
            crate::models::user::TokenRequest,
            // Books
            crate::models::book::Book,
            crate::models::book::Visibility,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookQuery,
            crate::models::book::OwnedBookQuery,
            // Wishlist
            crate::models::wishlist::WishlistItem,
            crate::models::wishlist::WishlistEntry,
            crate::models::wishlist::AddWishlistItem,
            // Orders
            crate::models::order::Order,
            crate::models::order::OrderStatus,
            crate::models::order::PaymentStatus,
            crate::models::order::CreateOrder,
            crate::models::order::UpdateOrder,
            crate::models::order::OrderQuery,
            crate::models::order::PaymentRecord,
            crate::models::order::InvoiceQuery,
            crate::models::order::CheckoutRequest,
            crate::models::order::CheckoutResponse,
            crate::models::order::ConfirmRequest,
            crate::models::order::ConfirmResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "Account management"),
        (name = "books", description = "Book listings"),
        (name = "wishlist", description = "Wishlists"),
        (name = "orders", description = "Orders and invoices"),
        (name = "payments", description = "Checkout and payment capture")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
