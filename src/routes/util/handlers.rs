use crate::schemas::{EmptyGenericResponse, GenericResponse};
use actix_web::web;

#[utoipa::path(
    get,
    path = "/util/health_check",
    tag = "Util",
    responses(
        (status=200, description= "Server is up", body= EmptyGenericResponse),
    )
)]
pub async fn health_check() -> web::Json<GenericResponse<()>> {
    web::Json(GenericResponse::success("Running Server", None))
}
