use crate::configuration::PaymentSettings;
use anyhow::Context;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// What the checkout needs from the gateway to open a hosted payment page.
#[derive(Debug)]
pub struct SessionRequest<'a> {
    pub transaction_ref: &'a str,
    pub amount: &'a BigDecimal,
    pub user_id: i64,
    pub customer_phone: &'a str,
    pub customer_email: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySession {
    pub session_id: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_session(
        &self,
        request: SessionRequest<'_>,
    ) -> Result<GatewaySession, anyhow::Error>;
}

#[derive(Debug, Serialize)]
struct CustomerDetails<'a> {
    customer_id: String,
    customer_phone: &'a str,
    customer_email: &'a str,
}

#[derive(Debug, Serialize)]
struct OrderMeta<'a> {
    return_url: &'a str,
    notify_url: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    order_id: &'a str,
    order_amount: &'a BigDecimal,
    order_currency: &'a str,
    customer_details: CustomerDetails<'a>,
    order_meta: OrderMeta<'a>,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    payment_session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorResponse {
    message: Option<String>,
}

#[derive(Debug)]
pub struct PaymentServiceClient {
    http_client: Client,
    base_url: String,
    client_id: String,
    client_secret: SecretString,
    api_version: String,
    currency: String,
    return_url: String,
    notify_url: String,
}

impl PaymentServiceClient {
    #[tracing::instrument(skip(settings))]
    pub fn new(settings: &PaymentSettings) -> Result<Self, anyhow::Error> {
        tracing::info!("Establishing connection to the payment server.");
        let http_client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build the payment gateway http client")?;
        Ok(Self {
            http_client,
            base_url: settings.base_url.to_owned(),
            client_id: settings.client_id.to_owned(),
            client_secret: SecretString::from(settings.client_secret.expose_secret().to_string()),
            api_version: settings.api_version.to_owned(),
            currency: settings.currency.to_owned(),
            return_url: settings.return_url.to_owned(),
            notify_url: settings.notify_url.to_owned(),
        })
    }
}

#[async_trait]
impl PaymentGateway for PaymentServiceClient {
    #[tracing::instrument(name = "Create payment gateway session", skip(self), fields(transaction_ref = %request.transaction_ref))]
    async fn create_session(
        &self,
        request: SessionRequest<'_>,
    ) -> Result<GatewaySession, anyhow::Error> {
        let url = format!("{}/orders", self.base_url);
        let body = CreateOrderRequest {
            order_id: request.transaction_ref,
            order_amount: request.amount,
            order_currency: &self.currency,
            customer_details: CustomerDetails {
                customer_id: request.user_id.to_string(),
                customer_phone: request.customer_phone,
                customer_email: request.customer_email,
            },
            order_meta: OrderMeta {
                return_url: &self.return_url,
                notify_url: &self.notify_url,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .header("x-client-id", &self.client_id)
            .header("x-client-secret", self.client_secret.expose_secret())
            .header("x-api-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .context("Failed to reach the payment gateway")?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GatewayErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            return Err(anyhow::anyhow!(
                "Payment gateway rejected the order: {}",
                message
            ));
        }
        let response_body: CreateOrderResponse = response
            .json()
            .await
            .map_err(|err| anyhow::anyhow!(format!("Failed to parse response: {}", err)))?;
        let session_id = response_body
            .payment_session_id
            .ok_or_else(|| anyhow::anyhow!("Payment session id missing in gateway response"))?;
        Ok(GatewaySession { session_id })
    }
}

/// Hands out sequential fake sessions without any network traffic.
#[derive(Debug, Default)]
pub struct DummyPaymentGateway {
    issued: AtomicUsize,
}

impl DummyPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for DummyPaymentGateway {
    async fn create_session(
        &self,
        request: SessionRequest<'_>,
    ) -> Result<GatewaySession, anyhow::Error> {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GatewaySession {
            session_id: format!("session_{}_{}", n, request.transaction_ref),
        })
    }
}

/// Gateway that is always down.
#[derive(Debug, Default)]
pub struct FailingPaymentGateway {}

#[async_trait]
impl PaymentGateway for FailingPaymentGateway {
    async fn create_session(
        &self,
        _request: SessionRequest<'_>,
    ) -> Result<GatewaySession, anyhow::Error> {
        Err(anyhow::anyhow!("Payment gateway unavailable"))
    }
}
