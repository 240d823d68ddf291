use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct ProductModel {
    pub id: i64,
    pub name: Option<String>,
    pub sale_price: BigDecimal,
    pub original_price: BigDecimal,
    pub is_available: bool,
    pub category: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub quantity: i32,
    pub unit: Option<String>,
    pub in_stock: i32,
    pub created_on: DateTime<Utc>,
    /// First image of the product, when the query asked for it.
    #[sqlx(default)]
    pub image: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct ProductImageModel {
    pub id: i64,
    pub product_id: i64,
    pub image_url: String,
}
