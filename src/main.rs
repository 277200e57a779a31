//! Boimela Server - Used-Book Marketplace
//!
//! REST API server for a used-book exchange.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boimela_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{provider::StripeCheckout, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("boimela_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Boimela Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Payment provider client
    let provider = StripeCheckout::new(&config.payment).expect("Failed to build provider client");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository,
        Arc::new(provider),
        config.auth.clone(),
        config.payment.clone(),
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/token", post(api::auth::issue_token))
        .route("/auth/me", get(api::auth::me))
        // Users
        .route("/users", post(api::users::signup))
        .route("/users", get(api::users::list_users))
        .route("/users/:email", patch(api::users::update_role))
        // Books
        .route("/books", get(api::books::list_public))
        .route("/books", post(api::books::create_book))
        .route("/allbooks", get(api::books::list_owned))
        .route("/allbooks/:id", get(api::books::get_owned))
        .route("/allbooks/:id", patch(api::books::update_book))
        .route("/allbooks/:id", delete(api::books::delete_book))
        // Wishlist
        .route("/wishlist", get(api::wishlist::list_wishlist))
        .route("/wishlist", post(api::wishlist::add_to_wishlist))
        .route("/wishlist/:book_id", delete(api::wishlist::remove_from_wishlist))
        // Orders
        .route("/orders", get(api::orders::list_orders))
        .route("/orders", post(api::orders::create_order))
        .route("/orders/:id", patch(api::orders::update_order))
        .route("/invoices", get(api::orders::list_invoices))
        // Payments
        .route("/create-checkout-session", post(api::payments::create_checkout_session))
        .route("/payment-success", post(api::payments::payment_success))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
