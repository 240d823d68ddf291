use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

fn default_quantity() -> i32 {
    1
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct AddToCartRequest {
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: i32,
}

#[derive(Serialize, Debug, ToSchema, FromRow)]
pub struct CartProductData {
    pub product_id: i64,
    pub quantity: i32,
    pub name: Option<String>,
    #[schema(value_type = String)]
    pub sale_price: BigDecimal,
    #[schema(value_type = String)]
    pub original_price: BigDecimal,
    pub slug: Option<String>,
    pub in_stock: i32,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CartData {
    pub products: Vec<CartProductData>,
    #[schema(value_type = String)]
    pub total: BigDecimal,
}
