#[cfg(test)]
pub mod tests {
    use crate::configuration::get_configuration;
    use crate::database::get_connection_pool;
    use crate::email_client::GenericEmailService;
    use crate::routes::user::UserAccount;
    use crate::store::{
        CartLine, CheckoutDraft, CheckoutRecord, CommerceStore, OrderRecord, OrderStatus,
        PaymentRecord, PaymentSettlement, PaymentStatus, SettledPayment, SettlementOutcome,
        WebhookEventRecord,
    };
    use async_trait::async_trait;
    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use sqlx::PgPool;
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    pub async fn get_test_pool() -> PgPool {
        let mut configuration = get_configuration().expect("Failed to read configuration.");
        configuration.application.port = 0;
        get_connection_pool(&configuration.database)
    }

    pub fn get_dummy_user_account(id: i64, email: &str) -> UserAccount {
        UserAccount {
            id,
            email: email.to_owned(),
            first_name: Some("Sanu".to_owned()),
            last_name: Some("Shilshad".to_owned()),
            is_active: true,
            is_admin: false,
            last_login: None,
            created_on: Utc::now(),
        }
    }

    pub fn amount(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[derive(Debug, Clone)]
    pub struct TestProduct {
        pub name: String,
        pub sale_price: BigDecimal,
        pub is_available: bool,
        pub in_stock: i32,
    }

    #[derive(Debug, Default)]
    pub struct MemoryState {
        pub users: HashMap<i64, String>,
        pub products: HashMap<i64, TestProduct>,
        /// (user_id, product_id, quantity)
        pub cart: Vec<(i64, i64, i32)>,
        pub orders: Vec<OrderRecord>,
        pub payments: Vec<PaymentRecord>,
        /// (payment_id, order_id)
        pub payment_orders: Vec<(i64, i64)>,
        pub webhook_events: Vec<WebhookEventRecord>,
        next_id: i64,
    }

    impl MemoryState {
        fn next_id(&mut self) -> i64 {
            self.next_id += 1;
            self.next_id
        }
    }

    /// Keeps every row in memory and stages multi-row writes so a failure
    /// leaves nothing behind, the same way a rolled back transaction does.
    #[derive(Debug, Default)]
    pub struct InMemoryCommerceStore {
        pub state: Mutex<MemoryState>,
        pub fail_checkout_write: AtomicBool,
        pub fail_event_recording: AtomicBool,
        pub fail_reads: AtomicBool,
    }

    impl InMemoryCommerceStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_user(&self, id: i64, email: &str) {
            self.state.lock().unwrap().users.insert(id, email.to_owned());
        }

        pub fn add_product(&self, id: i64, name: &str, price: &str, in_stock: i32) {
            self.state.lock().unwrap().products.insert(
                id,
                TestProduct {
                    name: name.to_owned(),
                    sale_price: amount(price),
                    is_available: true,
                    in_stock,
                },
            );
        }

        pub fn add_to_cart(&self, user_id: i64, product_id: i64, quantity: i32) {
            self.state
                .lock()
                .unwrap()
                .cart
                .push((user_id, product_id, quantity));
        }

        pub fn order_count(&self) -> usize {
            self.state.lock().unwrap().orders.len()
        }

        pub fn payment_count(&self) -> usize {
            self.state.lock().unwrap().payments.len()
        }

        pub fn payment(&self, payment_id: i64) -> Option<PaymentRecord> {
            self.state
                .lock()
                .unwrap()
                .payments
                .iter()
                .find(|p| p.id == payment_id)
                .cloned()
        }

        pub fn order_statuses(&self) -> Vec<OrderStatus> {
            self.state
                .lock()
                .unwrap()
                .orders
                .iter()
                .map(|o| o.status)
                .collect()
        }

        pub fn cart_size(&self, user_id: i64) -> usize {
            self.state
                .lock()
                .unwrap()
                .cart
                .iter()
                .filter(|(u, _, _)| *u == user_id)
                .count()
        }

        pub fn events(&self) -> Vec<WebhookEventRecord> {
            self.state.lock().unwrap().webhook_events.clone()
        }

        fn fail_if(&self, flag: &AtomicBool, what: &str) -> Result<(), anyhow::Error> {
            if flag.load(Ordering::SeqCst) {
                return Err(anyhow::anyhow!("Injected failure while {}", what));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CommerceStore for InMemoryCommerceStore {
        async fn fetch_cart_lines(&self, user_id: i64) -> Result<Vec<CartLine>, anyhow::Error> {
            self.fail_if(&self.fail_reads, "fetching cart")?;
            let state = self.state.lock().unwrap();
            Ok(state
                .cart
                .iter()
                .filter(|(u, _, _)| *u == user_id)
                .map(|(_, product_id, quantity)| {
                    let product = state.products.get(product_id);
                    CartLine {
                        product_id: *product_id,
                        quantity: *quantity,
                        product_name: product.map(|p| p.name.clone()),
                        sale_price: product.map(|p| p.sale_price.clone()),
                        is_available: product.map(|p| p.is_available),
                        in_stock: product.map(|p| p.in_stock),
                    }
                })
                .collect())
        }

        async fn create_checkout(
            &self,
            draft: &CheckoutDraft,
        ) -> Result<CheckoutRecord, anyhow::Error> {
            let mut state = self.state.lock().unwrap();
            let now = Utc::now();
            let mut staged_orders = vec![];
            for line in &draft.lines {
                let id = state.next_id();
                staged_orders.push(OrderRecord {
                    id,
                    user_id: draft.user_id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    address: draft.address.clone(),
                    total_amount: line.total_amount.clone(),
                    status: OrderStatus::Pending,
                    created_on: now,
                    updated_on: None,
                });
            }
            // Orders are staged, the payment insert is what fails.
            self.fail_if(&self.fail_checkout_write, "saving payment")?;
            let payment_id = state.next_id();
            let payment = PaymentRecord {
                id: payment_id,
                user_id: draft.user_id,
                transaction_ref: draft.transaction_ref.clone(),
                session_id: draft.session_id.clone(),
                address: draft.address.clone(),
                customer_phone: draft.customer_phone.clone(),
                amount: draft.amount.clone(),
                paid_amount: None,
                paid_on: None,
                gateway_payment_id: None,
                payment_method: None,
                status: PaymentStatus::Pending,
                created_on: now,
            };
            let order_ids: Vec<i64> = staged_orders.iter().map(|o| o.id).collect();
            state.orders.extend(staged_orders);
            state.payments.push(payment);
            for order_id in &order_ids {
                state.payment_orders.push((payment_id, *order_id));
            }
            Ok(CheckoutRecord {
                payment_id,
                order_ids,
            })
        }

        async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderRecord>, anyhow::Error> {
            self.fail_if(&self.fail_reads, "fetching order")?;
            let state = self.state.lock().unwrap();
            Ok(state.orders.iter().find(|o| o.id == order_id).cloned())
        }

        async fn fetch_payment_orders(
            &self,
            payment_id: i64,
        ) -> Result<Vec<OrderRecord>, anyhow::Error> {
            self.fail_if(&self.fail_reads, "fetching payment orders")?;
            let state = self.state.lock().unwrap();
            let order_ids: Vec<i64> = state
                .payment_orders
                .iter()
                .filter(|(p, _)| *p == payment_id)
                .map(|(_, o)| *o)
                .collect();
            Ok(state
                .orders
                .iter()
                .filter(|o| order_ids.contains(&o.id))
                .cloned()
                .collect())
        }

        async fn fetch_payment_by_transaction_ref(
            &self,
            transaction_ref: &str,
        ) -> Result<Option<PaymentRecord>, anyhow::Error> {
            self.fail_if(&self.fail_reads, "fetching payment")?;
            let state = self.state.lock().unwrap();
            Ok(state
                .payments
                .iter()
                .find(|p| p.transaction_ref == transaction_ref)
                .cloned())
        }

        async fn settle_payment(
            &self,
            settlement: &PaymentSettlement,
        ) -> Result<Option<SettledPayment>, anyhow::Error> {
            let mut state = self.state.lock().unwrap();
            let Some(payment) = state
                .payments
                .iter_mut()
                .find(|p| p.id == settlement.payment_id && p.status == PaymentStatus::Pending)
            else {
                return Ok(None);
            };
            payment.status = settlement.outcome.payment_status();
            payment.paid_amount = settlement.paid_amount.clone();
            payment.paid_on = settlement.paid_on;
            payment.gateway_payment_id = settlement.gateway_payment_id.clone();
            payment.payment_method = settlement.payment_method.clone();
            let payment = payment.clone();

            let order_ids: Vec<i64> = state
                .payment_orders
                .iter()
                .filter(|(p, _)| *p == payment.id)
                .map(|(_, o)| *o)
                .collect();
            let now = Utc::now();
            if let Some(order_status) = settlement.outcome.order_status() {
                for order in state.orders.iter_mut() {
                    if order_ids.contains(&order.id) && order.status == OrderStatus::Pending {
                        order.status = order_status;
                        order.updated_on = Some(now);
                    }
                }
            }
            let orders: Vec<OrderRecord> = state
                .orders
                .iter()
                .filter(|o| order_ids.contains(&o.id))
                .cloned()
                .collect();
            let mut customer_email = None;
            let mut product_names = vec![];
            if settlement.outcome == SettlementOutcome::Paid {
                let product_ids: Vec<i64> = orders.iter().map(|o| o.product_id).collect();
                state
                    .cart
                    .retain(|(u, p, _)| !(*u == payment.user_id && product_ids.contains(p)));
                customer_email = state.users.get(&payment.user_id).cloned();
                let mut ids = product_ids.clone();
                ids.sort();
                product_names = ids
                    .iter()
                    .filter_map(|id| state.products.get(id).map(|p| p.name.clone()))
                    .collect();
            }
            Ok(Some(SettledPayment {
                payment,
                orders,
                customer_email,
                product_names,
            }))
        }

        async fn record_webhook_event(
            &self,
            event: &WebhookEventRecord,
        ) -> Result<(), anyhow::Error> {
            self.fail_if(&self.fail_event_recording, "recording webhook event")?;
            self.state
                .lock()
                .unwrap()
                .webhook_events
                .push(event.clone());
            Ok(())
        }
    }

    /// Keeps every mail it is asked to send.
    #[derive(Debug, Default)]
    pub struct RecordingEmailClient {
        pub sent: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingEmailClient {
        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenericEmailService for RecordingEmailClient {
        async fn send_text_email(
            &self,
            to: &str,
            subject: &str,
            body: String,
        ) -> Result<(), anyhow::Error> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_owned(), subject.to_owned(), body));
            Ok(())
        }

        async fn send_html_email(
            &self,
            to: &str,
            subject: &str,
            body: String,
        ) -> Result<(), anyhow::Error> {
            self.send_text_email(to, subject, body).await
        }
    }

    #[derive(Debug, Default)]
    pub struct FailingEmailClient {}

    #[async_trait]
    impl GenericEmailService for FailingEmailClient {
        async fn send_text_email(
            &self,
            _to: &str,
            _subject: &str,
            _body: String,
        ) -> Result<(), anyhow::Error> {
            Err(anyhow::anyhow!("SMTP server refused the connection"))
        }

        async fn send_html_email(
            &self,
            _to: &str,
            _subject: &str,
            _body: String,
        ) -> Result<(), anyhow::Error> {
            Err(anyhow::anyhow!("SMTP server refused the connection"))
        }
    }

    /// Never answers within any sane timeout.
    #[derive(Debug, Default)]
    pub struct HangingEmailClient {}

    #[async_trait]
    impl GenericEmailService for HangingEmailClient {
        async fn send_text_email(
            &self,
            _to: &str,
            _subject: &str,
            _body: String,
        ) -> Result<(), anyhow::Error> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn send_html_email(
            &self,
            to: &str,
            subject: &str,
            body: String,
        ) -> Result<(), anyhow::Error> {
            self.send_text_email(to, subject, body).await
        }
    }
}
