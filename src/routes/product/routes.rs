use actix_web::web;

use super::handlers::{
    add_product_image, admin_list_products, create_product, get_product, list_categories,
    list_product_images, list_products, patch_product, remove_product, remove_product_image,
};
use crate::routes::user::{AdminValidation, RequireAuth};

pub fn product_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_product))
            .wrap(AdminValidation)
            .wrap(RequireAuth),
    );
    cfg.service(web::resource("/list").route(web::get().to(list_products)));
    cfg.service(web::resource("/categories").route(web::get().to(list_categories)));
    cfg.service(
        web::resource("/admin/list")
            .route(web::get().to(admin_list_products))
            .wrap(AdminValidation)
            .wrap(RequireAuth),
    );
    cfg.service(
        web::resource("/image")
            .route(web::post().to(add_product_image))
            .wrap(AdminValidation)
            .wrap(RequireAuth),
    );
    cfg.service(
        web::resource("/image/{id}")
            .route(web::delete().to(remove_product_image))
            .wrap(AdminValidation)
            .wrap(RequireAuth),
    );
    cfg.service(web::resource("/{id}/images").route(web::get().to(list_product_images)));
    // Reads are public, writes take an `AdminAccount`.
    cfg.service(
        web::resource("/{id}")
            .route(web::get().to(get_product))
            .route(web::patch().to(patch_product))
            .route(web::delete().to(remove_product)),
    );
}
