use actix_web::web;

use super::handlers::{add_to_cart, delete_from_cart, get_cart};

pub fn cart_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(get_cart)));
    cfg.service(web::resource("/add").route(web::post().to(add_to_cart)));
    cfg.service(web::resource("/{product_id}").route(web::delete().to(delete_from_cart)));
}
