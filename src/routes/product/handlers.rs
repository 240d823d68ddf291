use super::schemas::{
    AdminProductListQuery, ProductData, ProductImageData, ProductImageRequest, ProductListQuery,
    ProductRequest,
};
use super::utils::{
    delete_product, delete_product_image, fetch_admin_products, fetch_categories, fetch_product,
    fetch_product_images, fetch_products, save_product, save_product_image, update_product,
};
use crate::errors::GenericError;
use crate::routes::user::AdminAccount;
use crate::schemas::{EmptyGenericResponse, GenericResponse};
use actix_web::web;
use sqlx::PgPool;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/product",
    tag = "Product Admin",
    request_body(content = ProductRequest, description = "Request Body"),
    responses(
        (status=200, description= "Product created", body= GenericResponse<ProductData>),
        (status=400, description= "Invalid product", body= EmptyGenericResponse),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Create product API", skip(pool, body))]
pub async fn create_product(
    body: web::Json<ProductRequest>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<ProductData>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;
    let product = save_product(&pool, &body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully created product",
        Some(product.into_schema()),
    )))
}

#[utoipa::path(
    patch,
    path = "/product/{id}",
    tag = "Product Admin",
    request_body(content = ProductRequest, description = "Fields to change"),
    responses(
        (status=200, description= "Product updated", body= GenericResponse<ProductData>),
        (status=404, description= "Product not found", body= EmptyGenericResponse),
    ),
    params(
        ("id" = i64, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Update product API", skip(pool, body, _admin))]
pub async fn patch_product(
    path: web::Path<i64>,
    body: web::Json<ProductRequest>,
    pool: web::Data<PgPool>,
    _admin: AdminAccount,
) -> Result<web::Json<GenericResponse<ProductData>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;
    let product = update_product(&pool, path.into_inner(), &body)
        .await?
        .ok_or_else(|| GenericError::DataNotFound("Product not found".to_string()))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated product",
        Some(product.into_schema()),
    )))
}

#[utoipa::path(
    delete,
    path = "/product/{id}",
    tag = "Product Admin",
    responses(
        (status=200, description= "Product deleted", body= EmptyGenericResponse),
        (status=400, description= "Product is referenced by orders", body= EmptyGenericResponse),
        (status=404, description= "Product not found", body= EmptyGenericResponse),
    ),
    params(
        ("id" = i64, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Delete product API", skip(pool, _admin))]
pub async fn remove_product(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    _admin: AdminAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    delete_product(&pool, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Product deleted successfully",
        Some(()),
    )))
}

#[utoipa::path(
    get,
    path = "/product/list",
    tag = "Product",
    params(ProductListQuery),
    responses(
        (status=200, description= "Newest products first", body= GenericResponse<Vec<ProductData>>),
    )
)]
#[tracing::instrument(err, name = "Product list API", skip(pool))]
pub async fn list_products(
    query: web::Query<ProductListQuery>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<Vec<ProductData>>>, GenericError> {
    let products = fetch_products(&pool, query.limit, query.category.as_deref())
        .await?
        .into_iter()
        .map(|p| p.into_schema())
        .collect();
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched products",
        Some(products),
    )))
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "Product",
    responses(
        (status=200, description= "Product detail", body= GenericResponse<ProductData>),
        (status=404, description= "Product not found", body= EmptyGenericResponse),
    ),
    params(
        ("id" = i64, Path, description = "Product id"),
    )
)]
#[tracing::instrument(err, name = "Product detail API", skip(pool))]
pub async fn get_product(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<ProductData>>, GenericError> {
    let product = fetch_product(&pool, path.into_inner())
        .await?
        .ok_or_else(|| GenericError::DataNotFound("Product not found".to_string()))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched product",
        Some(product.into_schema()),
    )))
}

#[utoipa::path(
    get,
    path = "/product/categories",
    tag = "Product",
    responses(
        (status=200, description= "Distinct categories", body= GenericResponse<Vec<String>>),
    )
)]
#[tracing::instrument(err, name = "Product categories API", skip(pool))]
pub async fn list_categories(
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<Vec<String>>>, GenericError> {
    let categories = fetch_categories(&pool).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched categories",
        Some(categories),
    )))
}

#[utoipa::path(
    get,
    path = "/product/admin/list",
    tag = "Product Admin",
    params(
        AdminProductListQuery,
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    ),
    responses(
        (status=200, description= "Filtered products", body= GenericResponse<Vec<ProductData>>),
    )
)]
#[tracing::instrument(err, name = "Admin product list API", skip(pool))]
pub async fn admin_list_products(
    query: web::Query<AdminProductListQuery>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<Vec<ProductData>>>, GenericError> {
    let products = fetch_admin_products(
        &pool,
        query.name.as_deref(),
        query.category.as_deref(),
        query.get_image,
    )
    .await?
    .into_iter()
    .map(|p| p.into_schema())
    .collect();
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched products",
        Some(products),
    )))
}

#[utoipa::path(
    post,
    path = "/product/image",
    tag = "Product Admin",
    request_body(content = ProductImageRequest, description = "Request Body"),
    responses(
        (status=200, description= "Image registered", body= GenericResponse<ProductImageData>),
        (status=404, description= "Product not found", body= EmptyGenericResponse),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Add product image API", skip(pool))]
pub async fn add_product_image(
    body: web::Json<ProductImageRequest>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<ProductImageData>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;
    let image = save_product_image(&pool, &body).await?;
    Ok(web::Json(GenericResponse::success(
        "Image added successfully",
        Some(image.into_schema()),
    )))
}

#[utoipa::path(
    delete,
    path = "/product/image/{id}",
    tag = "Product Admin",
    responses(
        (status=200, description= "Image deleted", body= EmptyGenericResponse),
        (status=404, description= "Image not found", body= EmptyGenericResponse),
    ),
    params(
        ("id" = i64, Path, description = "Image id"),
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Delete product image API", skip(pool))]
pub async fn remove_product_image(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    delete_product_image(&pool, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Image deleted successfully",
        Some(()),
    )))
}

#[utoipa::path(
    get,
    path = "/product/{id}/images",
    tag = "Product",
    responses(
        (status=200, description= "Images of a product", body= GenericResponse<Vec<ProductImageData>>),
    ),
    params(
        ("id" = i64, Path, description = "Product id"),
    )
)]
#[tracing::instrument(err, name = "Product images API", skip(pool))]
pub async fn list_product_images(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<Vec<ProductImageData>>>, GenericError> {
    let images = fetch_product_images(&pool, path.into_inner())
        .await?
        .into_iter()
        .map(|i| i.into_schema())
        .collect();
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched images",
        Some(images),
    )))
}
