use super::schemas::{
    AdminOrderListQuery, CheckoutData, CheckoutRequest, OrderCountData, OrderCountQuery,
    OrderDetailData,
};
use super::utils::{
    count_orders, fetch_admin_orders, fetch_order_detail, fetch_user_orders, process_checkout,
};
use crate::errors::GenericError;
use crate::payment_client::PaymentGateway;
use crate::routes::user::UserAccount;
use crate::schemas::{EmptyGenericResponse, GenericResponse};
use crate::store::{CommerceStore, OrderRecord};
use actix_web::web;
use sqlx::PgPool;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/order/checkout",
    tag = "Order",
    request_body(content = CheckoutRequest, description = "Delivery details"),
    responses(
        (status=200, description= "Pending orders and payment session created", body= GenericResponse<CheckoutData>),
        (status=400, description= "Empty cart or unavailable product", body= EmptyGenericResponse),
        (status=401, description= "Missing or invalid token", body= EmptyGenericResponse),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
    )
)]
#[tracing::instrument(err, name = "Checkout API", skip(body, store, gateway, user), fields(user_id = user.id))]
pub async fn checkout(
    body: web::Json<CheckoutRequest>,
    store: web::Data<dyn CommerceStore>,
    gateway: web::Data<dyn PaymentGateway>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<CheckoutData>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;
    let data = process_checkout(store.get_ref(), gateway.get_ref(), &user, &body).await?;
    Ok(web::Json(GenericResponse::success(
        "Order placed, awaiting payment",
        Some(data),
    )))
}

#[utoipa::path(
    get,
    path = "/order/list",
    tag = "Order",
    responses(
        (status=200, description= "Orders of the caller, newest first", body= GenericResponse<Vec<OrderRecord>>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
    )
)]
#[tracing::instrument(err, name = "Order list API", skip(pool, user), fields(user_id = user.id))]
pub async fn list_orders(
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Vec<OrderRecord>>>, GenericError> {
    let orders = fetch_user_orders(&pool, user.id).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched orders",
        Some(orders),
    )))
}

#[utoipa::path(
    get,
    path = "/order/admin/list",
    tag = "Order Admin",
    params(
        AdminOrderListQuery,
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    ),
    responses(
        (status=200, description= "Orders, newest first", body= GenericResponse<Vec<OrderRecord>>),
    )
)]
#[tracing::instrument(err, name = "Admin order list API", skip(pool))]
pub async fn admin_list_orders(
    query: web::Query<AdminOrderListQuery>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<Vec<OrderRecord>>>, GenericError> {
    let orders = fetch_admin_orders(&pool, query.status, query.limit, query.offset).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched orders",
        Some(orders),
    )))
}

#[utoipa::path(
    get,
    path = "/order/admin/count",
    tag = "Order Admin",
    params(
        OrderCountQuery,
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    ),
    responses(
        (status=200, description= "Number of orders", body= GenericResponse<OrderCountData>),
    )
)]
#[tracing::instrument(err, name = "Admin order count API", skip(pool))]
pub async fn admin_count_orders(
    query: web::Query<OrderCountQuery>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<OrderCountData>>, GenericError> {
    let count = count_orders(&pool, query.status).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully counted orders",
        Some(OrderCountData { count }),
    )))
}

#[utoipa::path(
    get,
    path = "/order/admin/{id}",
    tag = "Order Admin",
    responses(
        (status=200, description= "Order with its product and payment", body= GenericResponse<OrderDetailData>),
        (status=404, description= "Order not found", body= EmptyGenericResponse),
    ),
    params(
        ("id" = i64, Path, description = "Order id"),
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Admin order detail API", skip(pool, store))]
pub async fn admin_get_order(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    store: web::Data<dyn CommerceStore>,
) -> Result<web::Json<GenericResponse<OrderDetailData>>, GenericError> {
    let detail = fetch_order_detail(&pool, store.get_ref(), path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched order",
        Some(detail),
    )))
}
