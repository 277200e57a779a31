//! Checkout and payment confirmation endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::order::{CheckoutRequest, CheckoutResponse, ConfirmRequest, ConfirmResponse},
};

use super::AuthenticatedUser;

/// Start checkout for an order (order's buyer only). Returns the provider's
/// hosted payment page URL.
#[utoipa::path(
    post,
    path = "/create-checkout-session",
    tag = "payments",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 403, description = "Not the order's buyer"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already paid or cancelled"),
        (status = 502, description = "Provider unavailable, retry later")
    )
)]
pub async fn create_checkout_session(
    State(state): State<crate::AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let response = state
        .services
        .payments
        .create_checkout_session(&principal, request.order_id)
        .await?;
    Ok(Json(response))
}

/// Confirm a checkout session. Open endpoint; the session id is the
/// capability. Idempotent: repeated and concurrent confirmations of the same
/// session yield the one payment record.
#[utoipa::path(
    post,
    path = "/payment-success",
    tag = "payments",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Reconciliation result", body = ConfirmResponse),
        (status = 404, description = "Referenced order not found"),
        (status = 502, description = "Provider unavailable, retry later")
    )
)]
pub async fn payment_success(
    State(state): State<crate::AppState>,
    Json(request): Json<ConfirmRequest>,
) -> AppResult<Json<ConfirmResponse>> {
    let response = state.services.payments.confirm(&request.session_id).await?;
    Ok(Json(response))
}
