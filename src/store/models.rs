use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Success,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "webhook_disposition", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WebhookDisposition {
    Applied,
    Duplicate,
    UnknownReference,
    AmountMismatch,
    InvalidPayload,
}

/// A cart row joined with its product. Product columns are `None` when the
/// product row is gone.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i32,
    pub product_name: Option<String>,
    pub sale_price: Option<BigDecimal>,
    pub is_available: Option<bool>,
    pub in_stock: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct DraftOrderLine {
    pub product_id: i64,
    pub quantity: i32,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct CheckoutDraft {
    pub user_id: i64,
    pub transaction_ref: String,
    pub session_id: String,
    pub address: String,
    pub customer_phone: String,
    pub amount: BigDecimal,
    pub lines: Vec<DraftOrderLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRecord {
    pub payment_id: i64,
    pub order_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct OrderRecord {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub address: String,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PaymentRecord {
    pub id: i64,
    pub user_id: i64,
    pub transaction_ref: String,
    pub session_id: String,
    pub address: String,
    pub customer_phone: String,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    #[schema(value_type = Option<String>)]
    pub paid_amount: Option<BigDecimal>,
    pub paid_on: Option<DateTime<Utc>>,
    pub gateway_payment_id: Option<String>,
    pub payment_method: Option<String>,
    pub status: PaymentStatus,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Paid,
    Failed { cancel_orders: bool },
}

impl SettlementOutcome {
    pub fn payment_status(&self) -> PaymentStatus {
        match self {
            SettlementOutcome::Paid => PaymentStatus::Success,
            SettlementOutcome::Failed { .. } => PaymentStatus::Failed,
        }
    }

    /// Status the payment's pending orders move to, `None` leaves them pending.
    pub fn order_status(&self) -> Option<OrderStatus> {
        match self {
            SettlementOutcome::Paid => Some(OrderStatus::Success),
            SettlementOutcome::Failed {
                cancel_orders: true,
            } => Some(OrderStatus::Cancelled),
            SettlementOutcome::Failed {
                cancel_orders: false,
            } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentSettlement {
    pub payment_id: i64,
    pub outcome: SettlementOutcome,
    pub paid_amount: Option<BigDecimal>,
    pub paid_on: Option<DateTime<Utc>>,
    pub gateway_payment_id: Option<String>,
    pub payment_method: Option<String>,
}

/// Result of a settlement that won the pending -> terminal transition.
#[derive(Debug, Clone)]
pub struct SettledPayment {
    pub payment: PaymentRecord,
    pub orders: Vec<OrderRecord>,
    pub customer_email: Option<String>,
    pub product_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WebhookEventRecord {
    pub transaction_ref: Option<String>,
    pub outcome: Option<String>,
    pub disposition: WebhookDisposition,
    pub payload: serde_json::Value,
}
