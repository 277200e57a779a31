//! Payment records repository for database operations

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::order::PaymentRecord,
    services::authz::InvoiceScope,
};

/// Insert payload for one payment capture
pub struct NewPayment<'a> {
    pub order_id: Uuid,
    pub session_id: &'a str,
    pub transaction_id: &'a str,
    pub amount: Decimal,
    pub buyer_email: &'a str,
    pub paid_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PaymentsRepository {
    pool: Pool<Postgres>,
}

impl PaymentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a payment record unless one already exists for the session.
    /// Returns None when the unique session_id index absorbed the insert;
    /// this, not a prior read, is what makes concurrent confirmations safe.
    pub async fn insert_once(&self, payment: &NewPayment<'_>) -> AppResult<Option<PaymentRecord>> {
        let inserted = sqlx::query_as::<_, PaymentRecord>(
            r#"
            INSERT INTO payments
                (id, order_id, session_id, transaction_id, amount, buyer_email, paid_at)
            VALUES ($1, $2, $3, $4, $5, LOWER($6), $7)
            ON CONFLICT (session_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payment.order_id)
        .bind(payment.session_id)
        .bind(payment.transaction_id)
        .bind(payment.amount)
        .bind(payment.buyer_email)
        .bind(payment.paid_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Get the payment record for a checkout session, if any
    pub async fn get_by_session(&self, session_id: &str) -> AppResult<Option<PaymentRecord>> {
        let record = sqlx::query_as::<_, PaymentRecord>(
            "SELECT * FROM payments WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// List payment records within the caller's scope, newest first
    pub async fn list_scoped(&self, scope: &InvoiceScope) -> AppResult<Vec<PaymentRecord>> {
        let records = match scope {
            InvoiceScope::All => {
                sqlx::query_as::<_, PaymentRecord>("SELECT * FROM payments ORDER BY paid_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
            InvoiceScope::Buyer(email) => {
                sqlx::query_as::<_, PaymentRecord>(
                    "SELECT * FROM payments WHERE LOWER(buyer_email) = LOWER($1) ORDER BY paid_at DESC",
                )
                .bind(email)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }
}
