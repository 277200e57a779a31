//! Book listing model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("price");
        err.message = Some("Price must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Listing visibility. Only public books appear in the open catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            _ => Err(format!("Invalid visibility: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for Visibility {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Visibility {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Visibility {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Book listing, owned by its seller
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub condition: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub visibility: Visibility,
    pub seller_email: String,
    pub seller_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create listing request. Seller identity comes from the verified principal,
/// never from the body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub condition: Option<String>,
    #[schema(value_type = String)]
    #[validate(custom(function = validate_price))]
    pub price: Decimal,
    pub visibility: Option<Visibility>,
}

/// Update listing request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub condition: Option<String>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = validate_price))]
    pub price: Option<Decimal>,
    pub visibility: Option<Visibility>,
}

/// Public catalog query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    pub category: Option<String>,
    pub author: Option<String>,
}

/// Owner-scoped listing query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct OwnedBookQuery {
    /// Owner email filter; librarians may only query their own email
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: Decimal) -> CreateBook {
        CreateBook {
            title: "Gitanjali".to_string(),
            author: None,
            category: None,
            description: None,
            cover_url: None,
            condition: None,
            price,
            visibility: None,
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(listing(Decimal::new(-1, 2)).validate().is_err());
        assert!(listing(Decimal::ZERO).validate().is_ok());
        assert!(listing(Decimal::new(1050, 2)).validate().is_ok());
    }

    #[test]
    fn negative_price_update_is_rejected() {
        let update = UpdateBook {
            title: None,
            author: None,
            category: None,
            description: None,
            cover_url: None,
            condition: None,
            price: Some(Decimal::new(-500, 2)),
            visibility: None,
        };
        assert!(update.validate().is_err());
    }
}
