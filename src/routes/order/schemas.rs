use crate::store::{OrderRecord, OrderStatus, PaymentRecord};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("invalid_phone")
            .with_message("Phone number must contain only digits".into()));
    }
    Ok(())
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CheckoutRequest {
    #[validate(
        length(min = 10, max = 15, message = "Phone number must be 10-15 characters"),
        custom(function = "validate_phone")
    )]
    pub customer_phone: String,
    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: String,
}

#[derive(Serialize, Debug, ToSchema, PartialEq)]
pub struct CheckoutData {
    pub payment_id: i64,
    pub transaction_ref: String,
    pub session_id: String,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    pub order_ids: Vec<i64>,
}

fn default_limit() -> i64 {
    20
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct AdminOrderListQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<OrderStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct OrderCountQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<OrderStatus>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct OrderCountData {
    pub count: i64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct OrderDetailData {
    pub order: OrderRecord,
    pub product_name: Option<String>,
    pub payment: Option<PaymentRecord>,
    /// Every order covered by the same payment, this one included.
    pub payment_orders: Vec<OrderRecord>,
}
