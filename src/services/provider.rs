//! Hosted-checkout payment provider client
//!
//! The provider is reached over HTTPS with a bounded timeout; any transport
//! failure surfaces as a retryable `AppError::Provider` and never mutates
//! local state.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    config::PaymentConfig,
    error::{AppError, AppResult},
};

/// Single line item for a checkout session
#[derive(Debug, Clone)]
pub struct LineItem {
    pub name: String,
    /// Exact integer minor units (cents)
    pub amount_cents: i64,
    pub currency: String,
    pub quantity: u32,
}

/// Newly created checkout session: id plus the hosted payment page URL
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSession {
    pub id: String,
    pub url: String,
}

/// Checkout session as reported by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub status: Option<String>,
    pub payment_intent: Option<String>,
    pub amount_total: Option<i64>,
    pub customer_email: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    /// The order this session pays for, embedded in the session metadata at
    /// creation time
    pub fn order_ref(&self) -> Option<Uuid> {
        self.metadata.get("order_id").and_then(|s| s.parse().ok())
    }

    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
    }

    /// Provider transaction identifier; falls back to the session id when the
    /// payment intent is not yet exposed
    pub fn transaction_id(&self) -> String {
        self.payment_intent.clone().unwrap_or_else(|| self.id.clone())
    }
}

/// Outbound interface to the checkout provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        line_item: &LineItem,
        order_id: Uuid,
        success_url: &str,
        cancel_url: &str,
    ) -> AppResult<CreatedSession>;

    async fn retrieve_session(&self, session_id: &str) -> AppResult<CheckoutSession>;
}

/// Stripe Checkout protocol implementation
pub struct StripeCheckout {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeCheckout {
    pub fn new(config: &PaymentConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            secret_key: config.secret_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn transient(e: reqwest::Error) -> AppError {
        AppError::Provider(format!("Checkout provider unreachable: {}", e))
    }

    async fn check_status(response: reqwest::Response) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Provider returned {}: {}", status, body);
            Err(AppError::Provider(format!(
                "Checkout provider returned {}",
                status
            )))
        }
    }
}

#[async_trait]
impl PaymentProvider for StripeCheckout {
    async fn create_checkout_session(
        &self,
        line_item: &LineItem,
        order_id: Uuid,
        success_url: &str,
        cancel_url: &str,
    ) -> AppResult<CreatedSession> {
        let amount = line_item.amount_cents.to_string();
        let quantity = line_item.quantity.to_string();
        let order_ref = order_id.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("line_items[0][quantity]", &quantity),
            ("line_items[0][price_data][currency]", &line_item.currency),
            ("line_items[0][price_data][unit_amount]", &amount),
            ("line_items[0][price_data][product_data][name]", &line_item.name),
            ("metadata[order_id]", &order_ref),
        ];

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(Self::transient)?;

        let response = Self::check_status(response).await?;
        response.json::<CreatedSession>().await.map_err(Self::transient)
    }

    async fn retrieve_session(&self, session_id: &str) -> AppResult<CheckoutSession> {
        let response = self
            .http
            .get(format!("{}/v1/checkout/sessions/{}", self.api_base, session_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(Self::transient)?;

        let response = Self::check_status(response).await?;
        response.json::<CheckoutSession>().await.map_err(Self::transient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_payload_decodes() {
        let json = r#"{
            "id": "cs_test_123",
            "object": "checkout.session",
            "status": "complete",
            "payment_intent": "pi_456",
            "amount_total": 1000,
            "customer_email": "a@x.com",
            "metadata": { "order_id": "7f2c9a6e-26b5-4e0f-9175-0a5f2d1c3b4a" }
        }"#;
        let session: CheckoutSession = serde_json::from_str(json).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.transaction_id(), "pi_456");
        assert_eq!(
            session.order_ref().unwrap().to_string(),
            "7f2c9a6e-26b5-4e0f-9175-0a5f2d1c3b4a"
        );
    }

    #[test]
    fn open_session_without_intent_falls_back_to_session_id() {
        let json = r#"{ "id": "cs_test_123", "status": "open" }"#;
        let session: CheckoutSession = serde_json::from_str(json).unwrap();
        assert!(!session.is_complete());
        assert_eq!(session.transaction_id(), "cs_test_123");
        assert!(session.order_ref().is_none());
    }
}
