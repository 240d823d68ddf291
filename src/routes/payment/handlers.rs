use super::schemas::{NotificationPolicy, PaymentNotification, WebhookAck};
use super::utils::process_payment_notification;
use crate::email_client::GenericEmailService;
use crate::errors::GenericError;
use crate::schemas::{EmptyGenericResponse, GenericResponse};
use crate::store::CommerceStore;
use actix_web::web;

#[utoipa::path(
    post,
    path = "/payment/notification",
    tag = "Payment",
    description = "Callback used by the payment gateway to report the outcome of a payment. \
        Anything that is not a persistence failure is acknowledged with 200.",
    summary = "Payment Notification",
    request_body(content = PaymentNotification, description = "Gateway payload"),
    responses(
        (status=200, description= "Notification acknowledged", body= GenericResponse<WebhookAck>),
        (status=500, description= "Persistence failure, the gateway should retry", body= EmptyGenericResponse),
    )
)]
#[tracing::instrument(err, name = "Payment notification", skip(body, store, email_client, policy))]
pub async fn payment_notification(
    body: web::Bytes,
    store: web::Data<dyn CommerceStore>,
    email_client: web::Data<dyn GenericEmailService>,
    policy: web::Data<NotificationPolicy>,
) -> Result<web::Json<GenericResponse<WebhookAck>>, GenericError> {
    let disposition = process_payment_notification(
        store.get_ref(),
        email_client.get_ref(),
        &policy,
        &body,
    )
    .await?;
    Ok(web::Json(GenericResponse::success(
        "Notification received",
        Some(WebhookAck { disposition }),
    )))
}
