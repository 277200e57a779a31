//! Order/payment reconciliation
//!
//! Drives the order state machine from checkout-session confirmation. The
//! provider may report completion more than once (client polling, webhook
//! replay, retried requests); `confirm` stays idempotent end-to-end by
//! funnelling every capture through the unique session_id insert.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    config::PaymentConfig,
    error::{AppError, AppResult},
    models::{
        order::{CheckoutResponse, ConfirmResponse, OrderStatus, PaymentStatus},
        user::Principal,
    },
    repository::{payments::NewPayment, Repository},
    services::{
        authz::{self, Action},
        provider::{CheckoutSession, LineItem, PaymentProvider},
    },
};

/// What a provider poll found
#[derive(Debug)]
enum SessionPoll {
    /// Session not complete yet; echo known identifiers, mutate nothing
    Incomplete(ConfirmResponse),
    Complete(CheckoutSession),
}

/// Fetch a session and classify it. Separated from `confirm` so the
/// no-mutation contract of the incomplete branch is a pure mapping.
async fn poll_provider(provider: &dyn PaymentProvider, session_id: &str) -> AppResult<SessionPoll> {
    let session = provider.retrieve_session(session_id).await?;
    if session.is_complete() {
        Ok(SessionPoll::Complete(session))
    } else {
        Ok(SessionPoll::Incomplete(ConfirmResponse {
            order_id: session.order_ref(),
            transaction_id: session.payment_intent.clone(),
            paid: false,
        }))
    }
}

/// Convert a two-decimal price into exact integer cents
fn to_cents(amount: Decimal) -> AppResult<i64> {
    let cents = amount * Decimal::from(100);
    if !cents.fract().is_zero() {
        return Err(AppError::Validation(format!(
            "Amount {} has sub-cent precision",
            amount
        )));
    }
    cents
        .trunc()
        .to_i64()
        .ok_or_else(|| AppError::Validation(format!("Amount {} out of range", amount)))
}

#[derive(Clone)]
pub struct PaymentsService {
    repository: Repository,
    provider: Arc<dyn PaymentProvider>,
    config: PaymentConfig,
}

impl PaymentsService {
    pub fn new(
        repository: Repository,
        provider: Arc<dyn PaymentProvider>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            repository,
            provider,
            config,
        }
    }

    /// Create a hosted checkout session for an order and move the order to
    /// awaiting_payment. Only the order's buyer may start checkout.
    pub async fn create_checkout_session(
        &self,
        principal: &Principal,
        order_id: Uuid,
    ) -> AppResult<CheckoutResponse> {
        let order = self
            .repository
            .orders
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        authz::authorize(principal, &Action::PayOrder { buyer: &order.buyer_email })
            .into_result()?;

        if order.payment_status == PaymentStatus::Paid {
            return Err(AppError::Conflict("Order is already paid".to_string()));
        }
        if order.status == OrderStatus::Cancelled {
            return Err(AppError::Conflict("Order is cancelled".to_string()));
        }

        let line_item = LineItem {
            name: order.book_title.clone(),
            amount_cents: to_cents(order.amount)?,
            currency: self.config.currency.clone(),
            quantity: 1,
        };

        let created = self
            .provider
            .create_checkout_session(
                &line_item,
                order.id,
                &self.config.success_url,
                &self.config.cancel_url,
            )
            .await?;

        self.repository.orders.attach_session(order.id, &created.id).await?;

        tracing::info!(order_id = %order.id, session_id = %created.id, "Checkout session created");

        Ok(CheckoutResponse { url: created.url })
    }

    /// Reconcile an order with the provider's view of a checkout session.
    ///
    /// Safe to call any number of times, concurrently, for the same session:
    /// the order update is applied on every completed poll so it tracks the
    /// provider's latest truth, while the payment record insert is absorbed
    /// by the unique session_id index after the first capture.
    pub async fn confirm(&self, session_id: &str) -> AppResult<ConfirmResponse> {
        let session = match poll_provider(self.provider.as_ref(), session_id).await? {
            SessionPoll::Incomplete(response) => return Ok(response),
            SessionPoll::Complete(session) => session,
        };

        let order_id = session.order_ref().ok_or_else(|| {
            AppError::Validation("Checkout session carries no order reference".to_string())
        })?;

        let transaction_id = session.transaction_id();
        let order = self.repository.orders.mark_paid(order_id, &transaction_id).await?;

        let amount = session
            .amount_total
            .map(|cents| Decimal::new(cents, 2))
            .unwrap_or(order.amount);
        let buyer_email = session
            .customer_email
            .clone()
            .unwrap_or_else(|| order.buyer_email.clone());

        let new_payment = NewPayment {
            order_id: order.id,
            session_id: &session.id,
            transaction_id: &transaction_id,
            amount,
            buyer_email: &buyer_email,
            paid_at: Utc::now(),
        };

        let record = match self.repository.payments.insert_once(&new_payment).await? {
            Some(record) => {
                tracing::info!(order_id = %order.id, session_id, "Payment recorded");
                record
            }
            // Lost the insert race or already confirmed earlier; the stored
            // record is the answer.
            None => self
                .repository
                .payments
                .get_by_session(session_id)
                .await?
                .ok_or_else(|| {
                    AppError::Internal("Payment record vanished after conflict".to_string())
                })?,
        };

        Ok(ConfirmResponse {
            order_id: Some(record.order_id),
            transaction_id: Some(record.transaction_id),
            paid: true,
        })
    }

    /// Invoices visible to the principal
    pub async fn list_invoices(
        &self,
        principal: &Principal,
        buyer_filter: Option<&str>,
    ) -> AppResult<Vec<crate::models::order::PaymentRecord>> {
        authz::authorize(principal, &Action::ReadInvoices { buyer: buyer_filter })
            .into_result()?;

        let scope = authz::invoice_scope(principal);
        self.repository.payments.list_scoped(&scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::provider::MockPaymentProvider;
    use std::collections::HashMap;

    fn session(status: &str, metadata: HashMap<String, String>) -> CheckoutSession {
        CheckoutSession {
            id: "cs_1".to_string(),
            status: Some(status.to_string()),
            payment_intent: Some("pi_1".to_string()),
            amount_total: Some(1000),
            customer_email: Some("a@x.com".to_string()),
            metadata,
        }
    }

    #[tokio::test]
    async fn incomplete_session_is_a_polling_read() {
        let mut provider = MockPaymentProvider::new();
        let meta = HashMap::from([(
            "order_id".to_string(),
            "7f2c9a6e-26b5-4e0f-9175-0a5f2d1c3b4a".to_string(),
        )]);
        provider
            .expect_retrieve_session()
            .returning(move |_| Ok(session("open", meta.clone())));

        match poll_provider(&provider, "cs_1").await.unwrap() {
            SessionPoll::Incomplete(response) => {
                assert!(!response.paid);
                assert_eq!(
                    response.order_id.unwrap().to_string(),
                    "7f2c9a6e-26b5-4e0f-9175-0a5f2d1c3b4a"
                );
                assert_eq!(response.transaction_id.as_deref(), Some("pi_1"));
            }
            SessionPoll::Complete(_) => panic!("open session classified as complete"),
        }
    }

    #[tokio::test]
    async fn complete_session_is_passed_through() {
        let mut provider = MockPaymentProvider::new();
        provider
            .expect_retrieve_session()
            .returning(|_| Ok(session("complete", HashMap::new())));

        assert!(matches!(
            poll_provider(&provider, "cs_1").await.unwrap(),
            SessionPoll::Complete(_)
        ));
    }

    #[tokio::test]
    async fn transient_provider_failure_propagates_without_classification() {
        let mut provider = MockPaymentProvider::new();
        provider
            .expect_retrieve_session()
            .returning(|_| Err(AppError::Provider("timed out".to_string())));

        let err = poll_provider(&provider, "cs_1").await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }

    #[test]
    fn cents_conversion_is_exact() {
        assert_eq!(to_cents(Decimal::new(1000, 2)).unwrap(), 1000); // 10.00
        assert_eq!(to_cents(Decimal::new(5, 1)).unwrap(), 50); // 0.5
        assert_eq!(to_cents(Decimal::from(7)).unwrap(), 700);
        assert!(to_cents(Decimal::new(10005, 3)).is_err()); // 10.005
    }
}
