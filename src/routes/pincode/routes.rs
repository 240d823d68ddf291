use actix_web::web;

use super::handlers::{add_pincode, check_pincode, list_pincodes};
use crate::routes::user::{AdminValidation, RequireAuth};

pub fn pincode_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(add_pincode))
            .wrap(AdminValidation)
            .wrap(RequireAuth),
    );
    cfg.service(
        web::resource("/list")
            .route(web::get().to(list_pincodes))
            .wrap(AdminValidation)
            .wrap(RequireAuth),
    );
    cfg.service(web::resource("/check/{pincode}").route(web::get().to(check_pincode)));
}
