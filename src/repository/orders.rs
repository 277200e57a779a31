//! Orders repository for database operations

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::order::{Order, OrderQuery, OrderStatus, PaymentStatus},
    services::authz::OrderScope,
};

#[derive(Clone)]
pub struct OrdersRepository {
    pool: Pool<Postgres>,
}

impl OrdersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get order by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Create a pending, unpaid order
    pub async fn create(
        &self,
        book_id: Uuid,
        book_title: &str,
        buyer_email: &str,
        seller_email: &str,
        amount: Decimal,
    ) -> AppResult<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders
                (id, book_id, book_title, buyer_email, seller_email, amount,
                 status, payment_status)
            VALUES ($1, $2, $3, LOWER($4), LOWER($5), $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(book_title)
        .bind(buyer_email)
        .bind(seller_email)
        .bind(amount)
        .bind(OrderStatus::Pending)
        .bind(PaymentStatus::Unpaid)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// List orders within the caller's scope, applying any explicit filters.
    /// The scope restricts the predicate before it reaches storage, so a
    /// caller outside the scope cannot even observe row counts.
    pub async fn list_scoped(&self, scope: &OrderScope, query: &OrderQuery) -> AppResult<Vec<Order>> {
        let mut sql = String::from("SELECT * FROM orders WHERE true");
        let mut binds: Vec<String> = Vec::new();

        if let OrderScope::Participant(email) = scope {
            binds.push(email.clone());
            let n = binds.len();
            sql.push_str(&format!(
                " AND (LOWER(buyer_email) = LOWER(${n}) OR LOWER(seller_email) = LOWER(${n}))"
            ));
        }
        if let Some(ref buyer) = query.buyer_email {
            binds.push(buyer.clone());
            sql.push_str(&format!(" AND LOWER(buyer_email) = LOWER(${})", binds.len()));
        }
        if let Some(ref seller) = query.seller_email {
            binds.push(seller.clone());
            sql.push_str(&format!(" AND LOWER(seller_email) = LOWER(${})", binds.len()));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, Order>(&sql);
        for bind in &binds {
            q = q.bind(bind);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Update an order's status
    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        sqlx::query_as::<_, Order>("UPDATE orders SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))
    }

    /// Attach a checkout session and move the order to awaiting_payment
    pub async fn attach_session(&self, id: Uuid, session_id: &str) -> AppResult<Order> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET session_id = $2, status = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(session_id)
        .bind(OrderStatus::AwaitingPayment)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))
    }

    /// Record provider-confirmed payment on the order. Applied on every
    /// confirmation so the order always reflects the provider's latest truth,
    /// whether or not a payment record already exists.
    pub async fn mark_paid(&self, id: Uuid, transaction_id: &str) -> AppResult<Order> {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET payment_status = $2, status = $3, transaction_id = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(PaymentStatus::Paid)
        .bind(OrderStatus::Processing)
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))
    }
}
