use actix_web::web;

use super::handlers::{
    admin_count_orders, admin_get_order, admin_list_orders, checkout, list_orders,
};
use crate::routes::user::{AdminValidation, RequireAuth};

pub fn order_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/checkout")
            .route(web::post().to(checkout))
            .wrap(RequireAuth),
    );
    cfg.service(
        web::resource("/list")
            .route(web::get().to(list_orders))
            .wrap(RequireAuth),
    );
    cfg.service(
        web::scope("/admin")
            .service(web::resource("/list").route(web::get().to(admin_list_orders)))
            .service(web::resource("/count").route(web::get().to(admin_count_orders)))
            .service(web::resource("/{id}").route(web::get().to(admin_get_order)))
            .wrap(AdminValidation)
            .wrap(RequireAuth),
    );
}
