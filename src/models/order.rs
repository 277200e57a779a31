//! Order, payment record, and checkout types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Order lifecycle. `awaiting_payment` and `processing`/paid are entered only
/// through the payment reconciler; `completed` and `cancelled` are set by the
/// later fulfilment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    AwaitingPayment,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::AwaitingPayment => "awaiting_payment",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "awaiting_payment" => Ok(OrderStatus::AwaitingPayment),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for OrderStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for OrderStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for OrderStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Payment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for PaymentStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for PaymentStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for PaymentStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Order between a buyer and a seller for one book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub buyer_email: String,
    pub seller_email: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create order request. Buyer identity comes from the verified principal.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrder {
    pub book_id: Uuid,
}

/// Order update request. Paid/processing transitions are reserved for the
/// reconciler and rejected here.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrder {
    pub status: OrderStatus,
}

/// Order listing filters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct OrderQuery {
    pub buyer_email: Option<String>,
    pub seller_email: Option<String>,
}

/// Record of one captured payment. At most one ever exists per checkout
/// session id, enforced by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub order_id: Uuid,
    pub session_id: String,
    pub transaction_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub buyer_email: String,
    pub paid_at: DateTime<Utc>,
}

/// Invoice listing filters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct InvoiceQuery {
    pub buyer_email: Option<String>,
}

/// Checkout session creation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub order_id: Uuid,
}

/// Checkout session creation response: the provider-hosted payment page
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Payment confirmation request. The session id is the capability.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmRequest {
    pub session_id: String,
}

/// Payment confirmation response. `paid` is false for a still-open session;
/// that is a polling read, not an error.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct ConfirmResponse {
    pub order_id: Option<Uuid>,
    pub transaction_id: Option<String>,
    pub paid: bool,
}
