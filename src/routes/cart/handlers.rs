use super::schemas::{AddToCartRequest, CartData};
use super::utils::{add_cart_item, fetch_cart, remove_cart_item};
use crate::errors::GenericError;
use crate::routes::user::UserAccount;
use crate::schemas::{EmptyGenericResponse, GenericResponse};
use actix_web::web;
use sqlx::PgPool;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    responses(
        (status=200, description= "Cart of the caller", body= GenericResponse<CartData>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
    )
)]
#[tracing::instrument(err, name = "Fetch cart API", skip(pool, user), fields(user_id = user.id))]
pub async fn get_cart(
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<CartData>>, GenericError> {
    let cart = fetch_cart(&pool, user.id).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched cart",
        Some(cart),
    )))
}

#[utoipa::path(
    post,
    path = "/cart/add",
    tag = "Cart",
    request_body(content = AddToCartRequest, description = "Request Body"),
    responses(
        (status=200, description= "Product added to cart", body= EmptyGenericResponse),
        (status=400, description= "Item already in cart", body= EmptyGenericResponse),
        (status=404, description= "Product not found", body= EmptyGenericResponse),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
    )
)]
#[tracing::instrument(err, name = "Add to cart API", skip(pool, user), fields(user_id = user.id))]
pub async fn add_to_cart(
    body: web::Json<AddToCartRequest>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;
    add_cart_item(&pool, user.id, body.product_id, body.quantity).await?;
    Ok(web::Json(GenericResponse::success(
        "Product Added to Cart",
        Some(()),
    )))
}

#[utoipa::path(
    delete,
    path = "/cart/{product_id}",
    tag = "Cart",
    responses(
        (status=200, description= "Item removed from cart", body= EmptyGenericResponse),
    ),
    params(
        ("product_id" = i64, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "JWT token"),
    )
)]
#[tracing::instrument(err, name = "Remove from cart API", skip(pool, user), fields(user_id = user.id))]
pub async fn delete_from_cart(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    remove_cart_item(&pool, user.id, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Item removed from cart",
        Some(()),
    )))
}
