//! Order service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::order::{Order, OrderQuery, OrderStatus, UpdateOrder},
    models::user::Principal,
    repository::Repository,
    services::authz::{self, Action},
};

#[derive(Clone)]
pub struct OrdersService {
    repository: Repository,
}

impl OrdersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create an order for a listed book, with the principal as buyer
    pub async fn create(&self, principal: &Principal, book_id: Uuid) -> AppResult<Order> {
        authz::authorize(principal, &Action::CreateOrder { buyer: &principal.email })
            .into_result()?;

        let book = self
            .repository
            .books
            .get_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))?;

        self.repository
            .orders
            .create(
                book.id,
                &book.title,
                &principal.email,
                &book.seller_email,
                book.price,
            )
            .await
    }

    /// List orders visible to the principal, honoring explicit buyer/seller
    /// filters only when the engine allows them
    pub async fn list(&self, principal: &Principal, query: &OrderQuery) -> AppResult<Vec<Order>> {
        authz::authorize(
            principal,
            &Action::ReadOrders {
                buyer: query.buyer_email.as_deref(),
                seller: query.seller_email.as_deref(),
            },
        )
        .into_result()?;

        let scope = authz::order_scope(principal);
        self.repository.orders.list_scoped(&scope, query).await
    }

    /// Update an order's status: buyer, seller, or admin. Paid/processing
    /// transitions belong to the reconciler and are rejected here.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        update: &UpdateOrder,
    ) -> AppResult<Order> {
        let order = self
            .repository
            .orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        authz::authorize(
            principal,
            &Action::UpdateOrder {
                buyer: &order.buyer_email,
                seller: &order.seller_email,
            },
        )
        .into_result()?;

        match update.status {
            OrderStatus::Processing | OrderStatus::AwaitingPayment => {
                Err(AppError::Validation(
                    "Payment transitions are driven by checkout confirmation".to_string(),
                ))
            }
            status => self.repository.orders.update_status(id, status).await,
        }
    }
}
