use super::handlers::payment_notification;
use actix_web::web;

pub fn payment_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/notification").route(web::post().to(payment_notification)));
}
