use super::{
    cart_route, order_route, payment_route, pincode_route, product_route, user_route, util_route,
    RequireAuth,
};
use crate::openapi::ApiDoc;
use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn main_route(cfg: &mut web::ServiceConfig) {
    let openapi = ApiDoc::openapi();
    cfg.service(web::scope("/util").configure(util_route))
        .service(web::scope("/user").configure(user_route))
        .service(web::scope("/product").configure(product_route))
        .service(
            web::scope("/cart")
                .configure(cart_route)
                .wrap(RequireAuth),
        )
        .service(web::scope("/pincode").configure(pincode_route))
        .service(web::scope("/order").configure(order_route))
        .service(web::scope("/payment").configure(payment_route))
        .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", openapi));
}
