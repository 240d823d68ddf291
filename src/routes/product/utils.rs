use super::errors::ProductError;
use super::models::{ProductImageModel, ProductModel};
use super::schemas::{ProductData, ProductImageData, ProductImageRequest, ProductRequest};
use crate::utils::is_foreign_key_violation;
use anyhow::Context;
use bigdecimal::BigDecimal;
use sqlx::PgPool;

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.sale_price, p.original_price, p.is_available, \
    p.category, p.description, p.slug, p.quantity, p.unit, p.in_stock, p.created_on";

const FIRST_IMAGE: &str = "(SELECT pi.image_url FROM product_image pi \
    WHERE pi.product_id = p.id ORDER BY pi.id LIMIT 1) AS image";

pub const MAX_LIST_LIMIT: i64 = 100;

impl ProductModel {
    pub fn into_schema(self) -> ProductData {
        ProductData {
            id: self.id,
            name: self.name,
            sale_price: self.sale_price,
            original_price: self.original_price,
            is_available: self.is_available,
            category: self.category,
            description: self.description,
            slug: self.slug,
            quantity: self.quantity,
            unit: self.unit,
            in_stock: self.in_stock,
            image: self.image,
            created_on: self.created_on,
        }
    }
}

impl ProductImageModel {
    pub fn into_schema(self) -> ProductImageData {
        ProductImageData {
            id: self.id,
            product_id: self.product_id,
            image_url: self.image_url,
        }
    }
}

pub fn clamp_list_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LIST_LIMIT)
}

#[tracing::instrument(name = "Save product", skip(pool, product))]
pub async fn save_product(
    pool: &PgPool,
    product: &ProductRequest,
) -> Result<ProductModel, anyhow::Error> {
    let zero = BigDecimal::from(0);
    let query = format!(
        r#"INSERT INTO product AS p (name, sale_price, original_price, is_available, category,
        description, slug, quantity, unit, in_stock)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {PRODUCT_COLUMNS}"#
    );
    let saved = sqlx::query_as::<_, ProductModel>(&query)
        .bind(&product.name)
        .bind(product.sale_price.as_ref().unwrap_or(&zero))
        .bind(product.original_price.as_ref().unwrap_or(&zero))
        .bind(product.is_available.unwrap_or(false))
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.slug)
        .bind(product.quantity.unwrap_or(0))
        .bind(&product.unit)
        .bind(product.in_stock.unwrap_or(0))
        .fetch_one(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while saving product")
        })?;
    Ok(saved)
}

#[tracing::instrument(name = "Update product", skip(pool, product))]
pub async fn update_product(
    pool: &PgPool,
    product_id: i64,
    product: &ProductRequest,
) -> Result<Option<ProductModel>, anyhow::Error> {
    let query = format!(
        r#"UPDATE product AS p SET
        name = COALESCE($2, p.name),
        sale_price = COALESCE($3, p.sale_price),
        original_price = COALESCE($4, p.original_price),
        is_available = COALESCE($5, p.is_available),
        category = COALESCE($6, p.category),
        description = COALESCE($7, p.description),
        slug = COALESCE($8, p.slug),
        quantity = COALESCE($9, p.quantity),
        unit = COALESCE($10, p.unit),
        in_stock = COALESCE($11, p.in_stock)
        WHERE p.id = $1
        RETURNING {PRODUCT_COLUMNS}, {FIRST_IMAGE}"#
    );
    let updated = sqlx::query_as::<_, ProductModel>(&query)
        .bind(product_id)
        .bind(&product.name)
        .bind(&product.sale_price)
        .bind(&product.original_price)
        .bind(product.is_available)
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.slug)
        .bind(product.quantity)
        .bind(&product.unit)
        .bind(product.in_stock)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute update query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while updating product")
        })?;
    Ok(updated)
}

/// Removes a product and its images. Products that orders point at stay.
#[tracing::instrument(name = "Delete product", skip(pool))]
pub async fn delete_product(pool: &PgPool, product_id: i64) -> Result<(), ProductError> {
    let result = sqlx::query("DELETE FROM product WHERE id = $1")
        .bind(product_id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return ProductError::InUse(e.into());
            }
            tracing::error!("Failed to execute delete query: {:?}", e);
            ProductError::UnexpectedError(
                anyhow::Error::new(e).context("A database failure occurred while deleting product"),
            )
        })?;
    if result.rows_affected() == 0 {
        return Err(ProductError::NotFound("Product not found".to_string()));
    }
    Ok(())
}

#[tracing::instrument(name = "Fetch product list", skip(pool))]
pub async fn fetch_products(
    pool: &PgPool,
    limit: i64,
    category: Option<&str>,
) -> Result<Vec<ProductModel>, anyhow::Error> {
    let query = format!(
        r#"SELECT {PRODUCT_COLUMNS}, {FIRST_IMAGE}
        FROM product p
        WHERE ($1::text IS NULL OR p.category = $1)
        ORDER BY p.id DESC
        LIMIT $2"#
    );
    let products = sqlx::query_as::<_, ProductModel>(&query)
        .bind(category)
        .bind(clamp_list_limit(limit))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching products")
        })?;
    Ok(products)
}

#[tracing::instrument(name = "Fetch product", skip(pool))]
pub async fn fetch_product(
    pool: &PgPool,
    product_id: i64,
) -> Result<Option<ProductModel>, anyhow::Error> {
    let query = format!("SELECT {PRODUCT_COLUMNS}, {FIRST_IMAGE} FROM product p WHERE p.id = $1");
    let product = sqlx::query_as::<_, ProductModel>(&query)
        .bind(product_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching product")
        })?;
    Ok(product)
}

#[tracing::instrument(name = "Fetch product categories", skip(pool))]
pub async fn fetch_categories(pool: &PgPool) -> Result<Vec<String>, anyhow::Error> {
    let categories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT category FROM product WHERE category IS NOT NULL ORDER BY category",
    )
    .fetch_all(pool)
    .await
    .context("A database failure occurred while fetching categories")?;
    Ok(categories)
}

#[tracing::instrument(name = "Fetch admin product list", skip(pool))]
pub async fn fetch_admin_products(
    pool: &PgPool,
    name: Option<&str>,
    category: Option<&str>,
    get_image: bool,
) -> Result<Vec<ProductModel>, anyhow::Error> {
    let image_column = if get_image {
        FIRST_IMAGE
    } else {
        "NULL::text AS image"
    };
    let query = format!(
        r#"SELECT {PRODUCT_COLUMNS}, {image_column}
        FROM product p
        WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
        AND ($2::text IS NULL OR p.category = $2)
        ORDER BY p.id"#
    );
    let products = sqlx::query_as::<_, ProductModel>(&query)
        .bind(name)
        .bind(category)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching products")
        })?;
    Ok(products)
}

#[tracing::instrument(name = "Save product image", skip(pool))]
pub async fn save_product_image(
    pool: &PgPool,
    image: &ProductImageRequest,
) -> Result<ProductImageModel, ProductError> {
    let saved = sqlx::query_as::<_, ProductImageModel>(
        r#"INSERT INTO product_image (product_id, image_url) VALUES ($1, $2)
        RETURNING id, product_id, image_url"#,
    )
    .bind(image.product_id)
    .bind(&image.image_url)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            return ProductError::NotFound("Product not found".to_string());
        }
        tracing::error!("Failed to execute query: {:?}", e);
        ProductError::UnexpectedError(
            anyhow::Error::new(e).context("A database failure occurred while saving image"),
        )
    })?;
    Ok(saved)
}

#[tracing::instrument(name = "Delete product image", skip(pool))]
pub async fn delete_product_image(pool: &PgPool, image_id: i64) -> Result<(), ProductError> {
    let result = sqlx::query("DELETE FROM product_image WHERE id = $1")
        .bind(image_id)
        .execute(pool)
        .await
        .context("A database failure occurred while deleting image")?;
    if result.rows_affected() == 0 {
        return Err(ProductError::NotFound("Product Image not found".to_string()));
    }
    Ok(())
}

#[tracing::instrument(name = "Fetch product images", skip(pool))]
pub async fn fetch_product_images(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<ProductImageModel>, anyhow::Error> {
    let images = sqlx::query_as::<_, ProductImageModel>(
        "SELECT id, product_id, image_url FROM product_image WHERE product_id = $1 ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await
    .context("A database failure occurred while fetching images")?;
    Ok(images)
}
