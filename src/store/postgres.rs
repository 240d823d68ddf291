use super::models::{
    CartLine, CheckoutDraft, CheckoutRecord, OrderRecord, PaymentRecord, PaymentSettlement,
    SettledPayment, SettlementOutcome, WebhookEventRecord,
};
use super::CommerceStore;
use anyhow::Context;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::{PgPool, Postgres, Transaction};

const ORDER_COLUMNS: &str = "o.id, o.user_id, o.product_id, o.quantity, o.address, \
    o.total_amount, o.status, o.created_on, o.updated_on";

#[derive(Debug, Clone)]
pub struct PgCommerceStore {
    pool: PgPool,
}

impl PgCommerceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[tracing::instrument(name = "Save orders", skip(transaction, draft))]
async fn save_orders(
    transaction: &mut Transaction<'_, Postgres>,
    draft: &CheckoutDraft,
) -> Result<Vec<i64>, anyhow::Error> {
    let product_ids: Vec<i64> = draft.lines.iter().map(|l| l.product_id).collect();
    let quantities: Vec<i32> = draft.lines.iter().map(|l| l.quantity).collect();
    let totals: Vec<BigDecimal> = draft
        .lines
        .iter()
        .map(|l| l.total_amount.clone())
        .collect();
    let mut order_ids: Vec<i64> = sqlx::query_scalar(
        r#"INSERT INTO commerce_order (user_id, product_id, quantity, address, total_amount, status)
        SELECT $1, line.product_id, line.quantity, $2, line.total_amount, 'pending'
        FROM UNNEST($3::bigint[], $4::int[], $5::numeric[]) AS line(product_id, quantity, total_amount)
        RETURNING id"#,
    )
    .bind(draft.user_id)
    .bind(&draft.address)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&totals)
    .fetch_all(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while saving orders")
    })?;
    order_ids.sort_unstable();
    Ok(order_ids)
}

#[tracing::instrument(name = "Save payment", skip(transaction, draft), fields(transaction_ref = %draft.transaction_ref))]
async fn save_payment(
    transaction: &mut Transaction<'_, Postgres>,
    draft: &CheckoutDraft,
    order_ids: &[i64],
) -> Result<i64, anyhow::Error> {
    let payment_id: i64 = sqlx::query_scalar(
        r#"INSERT INTO payment (user_id, transaction_ref, session_id, address, customer_phone, amount, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending')
        RETURNING id"#,
    )
    .bind(draft.user_id)
    .bind(&draft.transaction_ref)
    .bind(&draft.session_id)
    .bind(&draft.address)
    .bind(&draft.customer_phone)
    .bind(&draft.amount)
    .fetch_one(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while saving payment")
    })?;

    sqlx::query(
        r#"INSERT INTO payment_order (payment_id, order_id)
        SELECT $1, order_id FROM UNNEST($2::bigint[]) AS order_id"#,
    )
    .bind(payment_id)
    .bind(order_ids)
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while linking orders to payment")
    })?;
    Ok(payment_id)
}

async fn fetch_orders_of_payment<'c, E>(
    executor: E,
    payment_id: i64,
) -> Result<Vec<OrderRecord>, sqlx::Error>
where
    E: sqlx::Executor<'c, Database = Postgres>,
{
    let query = format!(
        "SELECT {ORDER_COLUMNS} FROM commerce_order o
        INNER JOIN payment_order po ON po.order_id = o.id
        WHERE po.payment_id = $1
        ORDER BY o.id"
    );
    sqlx::query_as::<_, OrderRecord>(&query)
        .bind(payment_id)
        .fetch_all(executor)
        .await
}

#[async_trait]
impl CommerceStore for PgCommerceStore {
    #[tracing::instrument(name = "Fetch cart lines", skip(self))]
    async fn fetch_cart_lines(&self, user_id: i64) -> Result<Vec<CartLine>, anyhow::Error> {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"SELECT c.product_id, c.quantity, p.name AS product_name, p.sale_price,
            p.is_available, p.in_stock
            FROM cart_item c
            LEFT JOIN product p ON p.id = c.product_id
            WHERE c.user_id = $1
            ORDER BY c.created_on, c.product_id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching cart")
        })?;
        Ok(lines)
    }

    #[tracing::instrument(name = "Create checkout", skip(self, draft), fields(user_id = draft.user_id))]
    async fn create_checkout(
        &self,
        draft: &CheckoutDraft,
    ) -> Result<CheckoutRecord, anyhow::Error> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to acquire a Postgres connection from the pool")?;
        let order_ids = save_orders(&mut transaction, draft).await?;
        let payment_id = save_payment(&mut transaction, draft, &order_ids).await?;
        transaction
            .commit()
            .await
            .context("Failed to commit SQL transaction to store a checkout")?;
        Ok(CheckoutRecord {
            payment_id,
            order_ids,
        })
    }

    #[tracing::instrument(name = "Fetch order", skip(self))]
    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderRecord>, anyhow::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM commerce_order o WHERE o.id = $1");
        let order = sqlx::query_as::<_, OrderRecord>(&query)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to execute query: {:?}", e);
                anyhow::Error::new(e).context("A database failure occurred while fetching order")
            })?;
        Ok(order)
    }

    #[tracing::instrument(name = "Fetch payment orders", skip(self))]
    async fn fetch_payment_orders(
        &self,
        payment_id: i64,
    ) -> Result<Vec<OrderRecord>, anyhow::Error> {
        fetch_orders_of_payment(&self.pool, payment_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to execute query: {:?}", e);
                anyhow::Error::new(e)
                    .context("A database failure occurred while fetching payment orders")
            })
    }

    #[tracing::instrument(name = "Fetch payment by transaction reference", skip(self))]
    async fn fetch_payment_by_transaction_ref(
        &self,
        transaction_ref: &str,
    ) -> Result<Option<PaymentRecord>, anyhow::Error> {
        let payment = sqlx::query_as::<_, PaymentRecord>(
            r#"SELECT id, user_id, transaction_ref, session_id, address, customer_phone, amount,
            paid_amount, paid_on, gateway_payment_id, payment_method, status, created_on
            FROM payment WHERE transaction_ref = $1"#,
        )
        .bind(transaction_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching payment")
        })?;
        Ok(payment)
    }

    #[tracing::instrument(name = "Settle payment", skip(self, settlement), fields(payment_id = settlement.payment_id))]
    async fn settle_payment(
        &self,
        settlement: &PaymentSettlement,
    ) -> Result<Option<SettledPayment>, anyhow::Error> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to acquire a Postgres connection from the pool")?;

        // Only a pending payment may move; a concurrent delivery that already
        // settled it makes this match nothing.
        let payment = sqlx::query_as::<_, PaymentRecord>(
            r#"UPDATE payment SET status = $2, paid_amount = $3, paid_on = $4,
            gateway_payment_id = $5, payment_method = $6, updated_on = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, user_id, transaction_ref, session_id, address, customer_phone, amount,
            paid_amount, paid_on, gateway_payment_id, payment_method, status, created_on"#,
        )
        .bind(settlement.payment_id)
        .bind(settlement.outcome.payment_status())
        .bind(&settlement.paid_amount)
        .bind(settlement.paid_on)
        .bind(&settlement.gateway_payment_id)
        .bind(&settlement.payment_method)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute update query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while settling payment")
        })?;
        let Some(payment) = payment else {
            return Ok(None);
        };

        if let Some(order_status) = settlement.outcome.order_status() {
            sqlx::query(
                r#"UPDATE commerce_order SET status = $1, updated_on = now()
                WHERE status = 'pending'
                AND id IN (SELECT order_id FROM payment_order WHERE payment_id = $2)"#,
            )
            .bind(order_status)
            .bind(payment.id)
            .execute(&mut *transaction)
            .await
            .map_err(|e| {
                tracing::error!("Failed to execute update query: {:?}", e);
                anyhow::Error::new(e)
                    .context("A database failure occurred while updating order status")
            })?;
        }

        let orders = fetch_orders_of_payment(&mut *transaction, payment.id)
            .await
            .context("A database failure occurred while fetching settled orders")?;
        let product_ids: Vec<i64> = orders.iter().map(|o| o.product_id).collect();

        let mut customer_email = None;
        let mut product_names = vec![];
        if settlement.outcome == SettlementOutcome::Paid {
            sqlx::query("DELETE FROM cart_item WHERE user_id = $1 AND product_id = ANY($2)")
                .bind(payment.user_id)
                .bind(&product_ids)
                .execute(&mut *transaction)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to execute delete query: {:?}", e);
                    anyhow::Error::new(e)
                        .context("A database failure occurred while clearing the cart")
                })?;
            customer_email =
                sqlx::query_scalar::<_, String>("SELECT email FROM user_account WHERE id = $1")
                    .bind(payment.user_id)
                    .fetch_optional(&mut *transaction)
                    .await
                    .context("A database failure occurred while fetching customer email")?;
            product_names = sqlx::query_scalar::<_, Option<String>>(
                "SELECT name FROM product WHERE id = ANY($1) ORDER BY id",
            )
            .bind(&product_ids)
            .fetch_all(&mut *transaction)
            .await
            .context("A database failure occurred while fetching product names")?
            .into_iter()
            .flatten()
            .collect();
        }

        transaction
            .commit()
            .await
            .context("Failed to commit SQL transaction to settle a payment")?;
        Ok(Some(SettledPayment {
            payment,
            orders,
            customer_email,
            product_names,
        }))
    }

    #[tracing::instrument(name = "Record webhook event", skip(self, event), fields(disposition = ?event.disposition))]
    async fn record_webhook_event(&self, event: &WebhookEventRecord) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"INSERT INTO payment_webhook_event (transaction_ref, outcome, disposition, payload)
            VALUES ($1, $2, $3, $4)"#,
        )
        .bind(&event.transaction_ref)
        .bind(&event.outcome)
        .bind(event.disposition)
        .bind(&event.payload)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e)
                .context("A database failure occurred while recording webhook event")
        })?;
        Ok(())
    }
}
