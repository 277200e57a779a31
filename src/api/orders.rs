//! Order and invoice endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::order::{CreateOrder, InvoiceQuery, Order, OrderQuery, PaymentRecord, UpdateOrder},
};

use super::AuthenticatedUser;

/// List orders visible to the caller
#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    security(("bearer_auth" = [])),
    params(OrderQuery),
    responses(
        (status = 200, description = "Orders in scope", body = Vec<Order>),
        (status = 403, description = "Filter outside the caller's scope")
    )
)]
pub async fn list_orders(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.services.orders.list(&principal, &query).await?;
    Ok(Json(orders))
}

/// Create an order with the caller as buyer
#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(request): Json<CreateOrder>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.services.orders.create(&principal, request.book_id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Update an order's status (buyer, seller, or admin)
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    tag = "orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Reserved transition"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateOrder>,
) -> AppResult<Json<Order>> {
    let order = state.services.orders.update(&principal, id, &update).await?;
    Ok(Json(order))
}

/// List invoices visible to the caller (admin all, buyer own)
#[utoipa::path(
    get,
    path = "/invoices",
    tag = "orders",
    security(("bearer_auth" = [])),
    params(InvoiceQuery),
    responses(
        (status = 200, description = "Payment records in scope", body = Vec<PaymentRecord>),
        (status = 403, description = "Filter outside the caller's scope")
    )
)]
pub async fn list_invoices(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<InvoiceQuery>,
) -> AppResult<Json<Vec<PaymentRecord>>> {
    let invoices = state
        .services
        .payments
        .list_invoices(&principal, query.buyer_email.as_deref())
        .await?;
    Ok(Json(invoices))
}
