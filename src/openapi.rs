use crate::routes::{cart, order, payment, pincode, product, user, util};
use crate::schemas::EmptyGenericResponse;
use crate::store::{OrderRecord, OrderStatus, PaymentRecord, PaymentStatus, WebhookDisposition};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Storefront REST API", description = "Storefront commerce API endpoints")
    ),
    paths(
        util::handlers::health_check,
        user::handlers::register_user_account,
        user::handlers::verify_otp,
        user::handlers::resend_otp,
        user::handlers::login,
        user::handlers::admin_list_users,
        user::handlers::admin_update_user,
        product::handlers::create_product,
        product::handlers::patch_product,
        product::handlers::remove_product,
        product::handlers::list_products,
        product::handlers::get_product,
        product::handlers::list_categories,
        product::handlers::admin_list_products,
        product::handlers::add_product_image,
        product::handlers::remove_product_image,
        product::handlers::list_product_images,
        cart::handlers::get_cart,
        cart::handlers::add_to_cart,
        cart::handlers::delete_from_cart,
        pincode::handlers::add_pincode,
        pincode::handlers::list_pincodes,
        pincode::handlers::check_pincode,
        order::handlers::checkout,
        order::handlers::list_orders,
        order::handlers::admin_list_orders,
        order::handlers::admin_count_orders,
        order::handlers::admin_get_order,
        payment::handlers::payment_notification,
    ),
    components(schemas(
        EmptyGenericResponse,
        OrderRecord,
        OrderStatus,
        PaymentRecord,
        PaymentStatus,
        WebhookDisposition,
    ))
)]
pub struct ApiDoc {}
