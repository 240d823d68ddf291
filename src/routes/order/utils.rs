use super::errors::{CheckoutError, OrderFetchError};
use super::schemas::{CheckoutData, CheckoutRequest, OrderDetailData};
use crate::payment_client::{PaymentGateway, SessionRequest};
use crate::routes::cart::utils::cart_total;
use crate::routes::user::UserAccount;
use crate::store::{
    CartLine, CheckoutDraft, CommerceStore, DraftOrderLine, OrderRecord, OrderStatus,
    PaymentRecord,
};
use anyhow::Context;
use bigdecimal::BigDecimal;
use sqlx::PgPool;
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, user_id, product_id, quantity, address, total_amount, status, \
    created_on, updated_on";

pub const MAX_ORDER_PAGE: i64 = 100;

/// Turns cart lines into order lines, refusing the whole cart if any line
/// cannot be bought as-is.
pub fn validate_cart_lines(lines: &[CartLine]) -> Result<Vec<DraftOrderLine>, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    lines
        .iter()
        .map(|line| {
            let label = line
                .product_name
                .clone()
                .unwrap_or_else(|| format!("#{}", line.product_id));
            let Some(price) = &line.sale_price else {
                return Err(CheckoutError::InvalidCart(format!(
                    "Product #{} no longer exists",
                    line.product_id
                )));
            };
            if !line.is_available.unwrap_or(false) {
                return Err(CheckoutError::InvalidCart(format!(
                    "Product {} is not available",
                    label
                )));
            }
            if line.quantity <= 0 {
                return Err(CheckoutError::InvalidCart(format!(
                    "Invalid quantity for product {}",
                    label
                )));
            }
            if line.in_stock.unwrap_or(0) < line.quantity {
                return Err(CheckoutError::InvalidCart(format!(
                    "Insufficient stock for product {}",
                    label
                )));
            }
            Ok(DraftOrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                total_amount: price * BigDecimal::from(line.quantity),
            })
        })
        .collect()
}

/// Converts the caller's cart into pending orders and one pending payment.
///
/// Nothing is persisted until the gateway has handed out a session, and the
/// orders, the payment and their links are then written in one transaction.
#[tracing::instrument(name = "Process checkout", skip(store, gateway, user, request), fields(user_id = user.id))]
pub async fn process_checkout(
    store: &dyn CommerceStore,
    gateway: &dyn PaymentGateway,
    user: &UserAccount,
    request: &CheckoutRequest,
) -> Result<CheckoutData, CheckoutError> {
    let lines = store.fetch_cart_lines(user.id).await?;
    let order_lines = validate_cart_lines(&lines)?;
    let amount = cart_total(
        lines
            .iter()
            .filter_map(|line| line.sale_price.as_ref().map(|price| (price, line.quantity))),
    );
    let transaction_ref = Uuid::new_v4().to_string();

    let session = gateway
        .create_session(SessionRequest {
            transaction_ref: &transaction_ref,
            amount: &amount,
            user_id: user.id,
            customer_phone: &request.customer_phone,
            customer_email: &user.email,
        })
        .await
        .map_err(CheckoutError::GatewayError)?;

    let draft = CheckoutDraft {
        user_id: user.id,
        transaction_ref,
        session_id: session.session_id,
        address: request.address.trim().to_string(),
        customer_phone: request.customer_phone.trim().to_string(),
        amount,
        lines: order_lines,
    };
    let record = store.create_checkout(&draft).await?;
    tracing::info!(
        payment_id = record.payment_id,
        orders = record.order_ids.len(),
        "Checkout created"
    );
    Ok(CheckoutData {
        payment_id: record.payment_id,
        transaction_ref: draft.transaction_ref,
        session_id: draft.session_id,
        amount: draft.amount,
        order_ids: record.order_ids,
    })
}

#[tracing::instrument(name = "Fetch user orders", skip(pool))]
pub async fn fetch_user_orders(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<OrderRecord>, anyhow::Error> {
    let query = format!(
        "SELECT {ORDER_COLUMNS} FROM commerce_order WHERE user_id = $1 ORDER BY id DESC"
    );
    let orders = sqlx::query_as::<_, OrderRecord>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching orders")
        })?;
    Ok(orders)
}

#[tracing::instrument(name = "Fetch admin orders", skip(pool))]
pub async fn fetch_admin_orders(
    pool: &PgPool,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<OrderRecord>, anyhow::Error> {
    let query = format!(
        r#"SELECT {ORDER_COLUMNS} FROM commerce_order
        WHERE ($1::order_status IS NULL OR status = $1)
        ORDER BY id DESC
        LIMIT $2 OFFSET $3"#
    );
    let orders = sqlx::query_as::<_, OrderRecord>(&query)
        .bind(status)
        .bind(limit.clamp(1, MAX_ORDER_PAGE))
        .bind(offset.max(0))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching orders")
        })?;
    Ok(orders)
}

#[tracing::instrument(name = "Count orders", skip(pool))]
pub async fn count_orders(pool: &PgPool, status: Option<OrderStatus>) -> Result<i64, anyhow::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT count(*) FROM commerce_order WHERE ($1::order_status IS NULL OR status = $1)",
    )
    .bind(status)
    .fetch_one(pool)
    .await
    .context("A database failure occurred while counting orders")?;
    Ok(count)
}

#[tracing::instrument(name = "Fetch payment of order", skip(pool))]
async fn fetch_payment_of_order(
    pool: &PgPool,
    order_id: i64,
) -> Result<Option<PaymentRecord>, anyhow::Error> {
    let payment = sqlx::query_as::<_, PaymentRecord>(
        r#"SELECT p.id, p.user_id, p.transaction_ref, p.session_id, p.address, p.customer_phone,
        p.amount, p.paid_amount, p.paid_on, p.gateway_payment_id, p.payment_method, p.status,
        p.created_on
        FROM payment p
        INNER JOIN payment_order po ON po.payment_id = p.id
        WHERE po.order_id = $1"#,
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await
    .context("A database failure occurred while fetching payment of order")?;
    Ok(payment)
}

#[tracing::instrument(name = "Fetch order detail", skip(pool, store))]
pub async fn fetch_order_detail(
    pool: &PgPool,
    store: &dyn CommerceStore,
    order_id: i64,
) -> Result<OrderDetailData, OrderFetchError> {
    let order = store
        .fetch_order(order_id)
        .await?
        .ok_or(OrderFetchError::NotFound)?;
    let product_name =
        sqlx::query_scalar::<_, Option<String>>("SELECT name FROM product WHERE id = $1")
            .bind(order.product_id)
            .fetch_optional(pool)
            .await
            .context("A database failure occurred while fetching product name")?
            .flatten();
    let payment = fetch_payment_of_order(pool, order.id).await?;
    let payment_orders = match &payment {
        Some(payment) => store.fetch_payment_orders(payment.id).await?,
        None => vec![],
    };
    Ok(OrderDetailData {
        order,
        product_name,
        payment,
        payment_orders,
    })
}
