use actix_web::web;

use super::handlers::{
    admin_list_users, admin_update_user, login, register_user_account, resend_otp, verify_otp,
};
use super::middlewares::{AdminValidation, RequireAuth};

pub fn user_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register_user_account)));
    cfg.service(web::resource("/verify").route(web::post().to(verify_otp)));
    cfg.service(web::resource("/otp/resend").route(web::get().to(resend_otp)));
    cfg.service(web::resource("/login").route(web::post().to(login)));
    cfg.service(
        web::resource("/admin/list")
            .route(web::get().to(admin_list_users))
            .wrap(AdminValidation)
            .wrap(RequireAuth),
    );
    cfg.service(
        web::resource("/admin/{id}")
            .route(web::patch().to(admin_update_user))
            .wrap(AdminValidation)
            .wrap(RequireAuth),
    );
}
