use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn validate_non_negative_amount(value: &BigDecimal) -> Result<(), ValidationError> {
    if *value < BigDecimal::from(0) {
        return Err(ValidationError::new("negative_amount")
            .with_message("Price cannot be negative".into()));
    }
    Ok(())
}

/// Body of both product create and partial update. Absent fields keep
/// their current (or default) value.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_non_negative_amount"))]
    pub sale_price: Option<BigDecimal>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_non_negative_amount"))]
    pub original_price: Option<BigDecimal>,
    pub is_available: Option<bool>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub in_stock: Option<i32>,
}

fn default_limit() -> i64 {
    10
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct ProductListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub category: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct AdminProductListQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub get_image: bool,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProductData {
    pub id: i64,
    pub name: Option<String>,
    #[schema(value_type = String)]
    pub sale_price: BigDecimal,
    #[schema(value_type = String)]
    pub original_price: BigDecimal,
    pub is_available: bool,
    pub category: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub quantity: i32,
    pub unit: Option<String>,
    pub in_stock: i32,
    pub image: Option<String>,
    pub created_on: DateTime<Utc>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ProductImageRequest {
    pub product_id: i64,
    #[validate(url(message = "Image url is not valid"))]
    pub image_url: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProductImageData {
    pub id: i64,
    pub product_id: i64,
    pub image_url: String,
}
