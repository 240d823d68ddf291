mod models;
mod postgres;

pub use models::*;
pub use postgres::PgCommerceStore;

use async_trait::async_trait;

/// Persistence of the checkout and payment confirmation flow.
///
/// `create_checkout` and `settle_payment` are all-or-nothing: either every
/// row they touch is written or none is.
#[async_trait]
pub trait CommerceStore: Send + Sync {
    async fn fetch_cart_lines(&self, user_id: i64) -> Result<Vec<CartLine>, anyhow::Error>;

    async fn create_checkout(&self, draft: &CheckoutDraft)
        -> Result<CheckoutRecord, anyhow::Error>;

    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderRecord>, anyhow::Error>;

    /// Orders settled together by one payment, ordered by id.
    async fn fetch_payment_orders(&self, payment_id: i64)
        -> Result<Vec<OrderRecord>, anyhow::Error>;

    async fn fetch_payment_by_transaction_ref(
        &self,
        transaction_ref: &str,
    ) -> Result<Option<PaymentRecord>, anyhow::Error>;

    /// Moves a pending payment and its orders to their terminal state.
    /// Returns `None` when the payment had already left `pending`.
    async fn settle_payment(
        &self,
        settlement: &PaymentSettlement,
    ) -> Result<Option<SettledPayment>, anyhow::Error>;

    async fn record_webhook_event(&self, event: &WebhookEventRecord) -> Result<(), anyhow::Error>;
}
