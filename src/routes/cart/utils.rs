use super::schemas::{CartData, CartProductData};
use crate::errors::GenericError;
use crate::utils::{is_foreign_key_violation, is_unique_violation};
use anyhow::Context;
use bigdecimal::BigDecimal;
use sqlx::PgPool;

/// Σ price × quantity over the given lines.
pub fn cart_total<'a, I>(lines: I) -> BigDecimal
where
    I: IntoIterator<Item = (&'a BigDecimal, i32)>,
{
    lines
        .into_iter()
        .fold(BigDecimal::from(0), |acc, (price, quantity)| {
            acc + price * BigDecimal::from(quantity)
        })
}

#[tracing::instrument(name = "Fetch cart", skip(pool))]
pub async fn fetch_cart(pool: &PgPool, user_id: i64) -> Result<CartData, anyhow::Error> {
    let products = sqlx::query_as::<_, CartProductData>(
        r#"SELECT c.product_id, c.quantity, p.name, p.sale_price, p.original_price, p.slug,
        p.in_stock, p.unit, p.description,
        (SELECT pi.image_url FROM product_image pi
         WHERE pi.product_id = p.id ORDER BY pi.id LIMIT 1) AS image
        FROM cart_item c
        INNER JOIN product p ON p.id = c.product_id
        WHERE c.user_id = $1
        ORDER BY c.created_on, c.product_id"#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching cart")
    })?;
    let total = cart_total(products.iter().map(|p| (&p.sale_price, p.quantity)));
    Ok(CartData { products, total })
}

#[tracing::instrument(name = "Add cart item", skip(pool))]
pub async fn add_cart_item(
    pool: &PgPool,
    user_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<(), GenericError> {
    sqlx::query("INSERT INTO cart_item (user_id, product_id, quantity) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return GenericError::ValidationError("Item already in cart".to_string());
            }
            if is_foreign_key_violation(&e) {
                return GenericError::DataNotFound("Product not found".to_string());
            }
            tracing::error!("Failed to execute query: {:?}", e);
            GenericError::DatabaseError(
                "A database failure occurred while adding to cart".to_string(),
                e.into(),
            )
        })?;
    Ok(())
}

#[tracing::instrument(name = "Remove cart item", skip(pool))]
pub async fn remove_cart_item(
    pool: &PgPool,
    user_id: i64,
    product_id: i64,
) -> Result<(), anyhow::Error> {
    sqlx::query("DELETE FROM cart_item WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await
        .context("A database failure occurred while removing cart item")?;
    Ok(())
}
