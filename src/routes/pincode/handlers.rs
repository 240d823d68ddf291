use super::schemas::{PincodeAvailability, PincodeData, PincodeRequest};
use super::utils::{fetch_pincodes, is_pincode_serviceable, save_pincode};
use crate::errors::GenericError;
use crate::schemas::{EmptyGenericResponse, GenericResponse};
use actix_web::web;
use sqlx::PgPool;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/pincode",
    tag = "Pincode",
    request_body(content = PincodeRequest, description = "Request Body"),
    responses(
        (status=200, description= "Pincode Added", body= EmptyGenericResponse),
        (status=400, description= "Pincode already exists", body= EmptyGenericResponse),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Add pincode API", skip(pool))]
pub async fn add_pincode(
    body: web::Json<PincodeRequest>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;
    save_pincode(&pool, &body).await?;
    Ok(web::Json(GenericResponse::success("Pincode Added", Some(()))))
}

#[utoipa::path(
    get,
    path = "/pincode/list",
    tag = "Pincode",
    responses(
        (status=200, description= "All pincodes", body= GenericResponse<Vec<PincodeData>>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Pincode list API", skip(pool))]
pub async fn list_pincodes(
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<Vec<PincodeData>>>, GenericError> {
    let pincodes = fetch_pincodes(&pool).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched pincodes",
        Some(pincodes),
    )))
}

#[utoipa::path(
    get,
    path = "/pincode/check/{pincode}",
    tag = "Pincode",
    responses(
        (status=200, description= "Whether delivery is available", body= GenericResponse<PincodeAvailability>),
    ),
    params(
        ("pincode" = String, Path, description = "Pincode to check"),
    )
)]
#[tracing::instrument(err, name = "Check pincode API", skip(pool))]
pub async fn check_pincode(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<PincodeAvailability>>, GenericError> {
    let available = is_pincode_serviceable(&pool, &path).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully checked pincode",
        Some(PincodeAvailability { available }),
    )))
}
