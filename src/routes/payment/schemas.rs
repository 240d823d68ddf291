use crate::store::WebhookDisposition;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationOutcome {
    Success,
    Failed,
}

impl NotificationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationOutcome::Success => "success",
            NotificationOutcome::Failed => "failed",
        }
    }
}

/// Callback body posted by the payment gateway once the customer has paid
/// (or given up) on the hosted page.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct PaymentNotification {
    pub transaction_ref: String,
    pub outcome: NotificationOutcome,
    #[schema(value_type = Option<String>)]
    pub amount: Option<BigDecimal>,
    pub gateway_payment_id: Option<String>,
    pub payment_method: Option<String>,
    pub payment_time: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct WebhookAck {
    pub disposition: WebhookDisposition,
}

/// Startup-time knobs of the webhook handler.
#[derive(Debug, Clone)]
pub struct NotificationPolicy {
    pub cancel_orders_on_failure: bool,
    pub email_timeout: Duration,
}
