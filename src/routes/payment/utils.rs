use super::errors::PaymentNotificationError;
use super::schemas::{NotificationOutcome, NotificationPolicy, PaymentNotification};
use crate::email_client::{order_confirmation_email_body, GenericEmailService};
use crate::store::{
    CommerceStore, PaymentSettlement, SettledPayment, SettlementOutcome, WebhookDisposition,
    WebhookEventRecord,
};
use bigdecimal::BigDecimal;
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;

const ORDER_CONFIRMATION_SUBJECT: &str = "Your order is confirmed";

/// Gateways report amounts as JSON numbers, so anything past the paisa is
/// float noise.
pub fn amounts_match(expected: &BigDecimal, received: &BigDecimal) -> bool {
    expected.round(2) == received.round(2)
}

pub fn settlement_outcome(
    outcome: NotificationOutcome,
    policy: &NotificationPolicy,
) -> SettlementOutcome {
    match outcome {
        NotificationOutcome::Success => SettlementOutcome::Paid,
        NotificationOutcome::Failed => SettlementOutcome::Failed {
            cancel_orders: policy.cancel_orders_on_failure,
        },
    }
}

async fn record_event(
    store: &dyn CommerceStore,
    notification: Option<&PaymentNotification>,
    disposition: WebhookDisposition,
    payload: Value,
) {
    let event = WebhookEventRecord {
        transaction_ref: notification.map(|n| n.transaction_ref.to_owned()),
        outcome: notification.map(|n| n.outcome.as_str().to_owned()),
        disposition,
        payload,
    };
    if let Err(e) = store.record_webhook_event(&event).await {
        tracing::error!("Failed to record webhook event {:?}: {:?}", disposition, e);
    }
}

#[tracing::instrument(name = "Send order confirmation", skip(email_client, settled), fields(payment_id = settled.payment.id))]
pub async fn send_order_confirmation(
    email_client: &dyn GenericEmailService,
    settled: &SettledPayment,
    timeout: Duration,
) {
    let Some(email) = settled.customer_email.as_deref() else {
        tracing::warn!("No customer email on record, skipping order confirmation");
        return;
    };
    let amount = settled
        .payment
        .paid_amount
        .as_ref()
        .unwrap_or(&settled.payment.amount)
        .to_string();
    let body = order_confirmation_email_body(
        &settled.payment.transaction_ref,
        &amount,
        &settled.payment.address,
        &settled.product_names,
    );
    match tokio::time::timeout(
        timeout,
        email_client.send_html_email(email, ORDER_CONFIRMATION_SUBJECT, body),
    )
    .await
    {
        Ok(Ok(())) => tracing::info!("Order confirmation sent"),
        Ok(Err(e)) => tracing::error!("Failed to send order confirmation: {:?}", e),
        Err(_) => tracing::error!("Order confirmation timed out after {:?}", timeout),
    }
}

/// Applies one gateway callback and reports what was done with it.
///
/// Only a persistence failure while reading or settling the payment is an
/// error; every other anomaly is recorded and acknowledged.
#[tracing::instrument(
    name = "Process payment notification",
    skip(store, email_client, policy, body),
    fields(transaction_ref = tracing::field::Empty)
)]
pub async fn process_payment_notification(
    store: &dyn CommerceStore,
    email_client: &dyn GenericEmailService,
    policy: &NotificationPolicy,
    body: &[u8],
) -> Result<WebhookDisposition, PaymentNotificationError> {
    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Webhook body is not JSON: {}", e);
            let raw = Value::String(String::from_utf8_lossy(body).into_owned());
            record_event(store, None, WebhookDisposition::InvalidPayload, raw).await;
            return Ok(WebhookDisposition::InvalidPayload);
        }
    };
    let notification = match serde_json::from_value::<PaymentNotification>(payload.clone()) {
        Ok(notification) => notification,
        Err(e) => {
            tracing::warn!("Webhook body has an unexpected shape: {}", e);
            record_event(store, None, WebhookDisposition::InvalidPayload, payload).await;
            return Ok(WebhookDisposition::InvalidPayload);
        }
    };
    tracing::Span::current().record("transaction_ref", notification.transaction_ref.as_str());

    let payment = store
        .fetch_payment_by_transaction_ref(&notification.transaction_ref)
        .await
        .map_err(|e| {
            PaymentNotificationError::DatabaseError("Failed to fetch payment".to_string(), e)
        })?;
    let Some(payment) = payment else {
        tracing::error!(
            "Webhook for unknown transaction reference {}",
            notification.transaction_ref
        );
        record_event(
            store,
            Some(&notification),
            WebhookDisposition::UnknownReference,
            payload,
        )
        .await;
        return Ok(WebhookDisposition::UnknownReference);
    };

    if payment.status.is_terminal() {
        tracing::info!("Payment {} already settled, ignoring webhook", payment.id);
        record_event(store, Some(&notification), WebhookDisposition::Duplicate, payload).await;
        return Ok(WebhookDisposition::Duplicate);
    }

    if notification.outcome == NotificationOutcome::Success {
        if let Some(received) = &notification.amount {
            if !amounts_match(&payment.amount, received) {
                tracing::error!(
                    "Payment {} expected {} but gateway reported {}",
                    payment.id,
                    payment.amount,
                    received
                );
                record_event(
                    store,
                    Some(&notification),
                    WebhookDisposition::AmountMismatch,
                    payload,
                )
                .await;
                return Ok(WebhookDisposition::AmountMismatch);
            }
        }
    }

    let settlement = PaymentSettlement {
        payment_id: payment.id,
        outcome: settlement_outcome(notification.outcome, policy),
        paid_amount: match notification.outcome {
            NotificationOutcome::Success => Some(
                notification
                    .amount
                    .clone()
                    .unwrap_or_else(|| payment.amount.clone()),
            ),
            NotificationOutcome::Failed => None,
        },
        paid_on: match notification.outcome {
            NotificationOutcome::Success => Some(notification.payment_time.unwrap_or_else(Utc::now)),
            NotificationOutcome::Failed => notification.payment_time,
        },
        gateway_payment_id: notification.gateway_payment_id.clone(),
        payment_method: notification.payment_method.clone(),
    };
    let settled = store.settle_payment(&settlement).await.map_err(|e| {
        PaymentNotificationError::DatabaseError("Failed to settle payment".to_string(), e)
    })?;
    let Some(settled) = settled else {
        tracing::info!("Payment {} was settled concurrently", payment.id);
        record_event(store, Some(&notification), WebhookDisposition::Duplicate, payload).await;
        return Ok(WebhookDisposition::Duplicate);
    };

    tracing::info!(
        payment_id = settled.payment.id,
        orders = settled.orders.len(),
        "Payment settled as {:?}",
        settled.payment.status
    );
    record_event(store, Some(&notification), WebhookDisposition::Applied, payload).await;
    if settlement.outcome == SettlementOutcome::Paid {
        send_order_confirmation(email_client, &settled, policy.email_timeout).await;
    }
    Ok(WebhookDisposition::Applied)
}
