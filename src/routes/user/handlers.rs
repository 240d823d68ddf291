use super::schemas::{
    AdminUserUpdateRequest, AuthData, CreateUserAccount, LoginRequest, ResendOtpQuery,
    UserAccount, VerifyOtpRequest,
};
use super::utils::{
    fetch_user_by_email, fetch_user_by_id, fetch_users, get_auth_data, issue_otp, register_user,
    send_otp_email, update_last_login, update_user_by_admin, validate_user_credentials,
    verify_user_otp, OtpCheck,
};
use crate::configuration::{SecretSetting, UserSettings};
use crate::email_client::GenericEmailService;
use crate::errors::GenericError;
use crate::schemas::{EmptyGenericResponse, GenericResponse};
use actix_web::web;
use sqlx::PgPool;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/user/register",
    tag = "User",
    request_body(content = CreateUserAccount, description = "Request Body"),
    responses(
        (status=200, description= "Account created, OTP sent", body= GenericResponse<i64>),
        (status=400, description= "Validation failure", body= EmptyGenericResponse),
    )
)]
#[tracing::instrument(err, name = "User Account Registration API", skip(pool, body, email_client), fields(email = %body.email, user_id = tracing::field::Empty))]
pub async fn register_user_account(
    body: web::Json<CreateUserAccount>,
    pool: web::Data<PgPool>,
    email_client: web::Data<dyn GenericEmailService>,
) -> Result<web::Json<GenericResponse<i64>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;
    let email = body.email.get().to_owned();
    let user_id = register_user(&pool, body.into_inner()).await?;
    tracing::Span::current().record("user_id", tracing::field::display(&user_id));

    let otp = issue_otp(&pool, &email).await?;
    if let Err(e) = send_otp_email(email_client.get_ref(), &email, &otp).await {
        // The OTP stays valid and can be re-sent.
        tracing::error!("Failed to send OTP email: {:?}", e);
    }
    Ok(web::Json(GenericResponse::success(
        "Registration success",
        Some(user_id),
    )))
}

#[utoipa::path(
    post,
    path = "/user/verify",
    tag = "User",
    request_body(content = VerifyOtpRequest, description = "Request Body"),
    responses(
        (status=200, description= "OTP verified", body= EmptyGenericResponse),
        (status=400, description= "Missing, invalid or expired OTP", body= EmptyGenericResponse),
    )
)]
#[tracing::instrument(err, name = "Verify OTP API", skip(pool, body, user_settings), fields(email = %body.email))]
pub async fn verify_otp(
    body: web::Json<VerifyOtpRequest>,
    pool: web::Data<PgPool>,
    user_settings: web::Data<UserSettings>,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    let validity = chrono::Duration::minutes(user_settings.otp_validity_minutes);
    match verify_user_otp(&pool, body.email.get(), &body.otp, validity).await? {
        OtpCheck::Verified => Ok(web::Json(GenericResponse::success(
            "OTP verified successfully.",
            Some(()),
        ))),
        OtpCheck::Rejected(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/user/otp/resend",
    tag = "User",
    params(ResendOtpQuery),
    responses(
        (status=200, description= "OTP sent", body= EmptyGenericResponse),
        (status=400, description= "Unknown or already active user", body= EmptyGenericResponse),
    )
)]
#[tracing::instrument(err, name = "Resend OTP API", skip(pool, query, email_client), fields(email = %query.email))]
pub async fn resend_otp(
    query: web::Query<ResendOtpQuery>,
    pool: web::Data<PgPool>,
    email_client: web::Data<dyn GenericEmailService>,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    let email = query.email.get();
    let user = fetch_user_by_email(&pool, email).await?;
    if !user.is_some_and(|u| !u.is_active) {
        return Err(GenericError::ValidationError(
            "Access Denied User does not exists or already active".to_string(),
        ));
    }
    let otp = issue_otp(&pool, email).await?;
    send_otp_email(email_client.get_ref(), email, &otp)
        .await
        .map_err(|e| {
            tracing::error!("Failed to send OTP email: {:?}", e);
            GenericError::UnexpectedCustomError("Failed to send OTP email".to_string())
        })?;
    Ok(web::Json(GenericResponse::success("otp sent", Some(()))))
}

#[utoipa::path(
    post,
    path = "/user/login",
    tag = "User",
    request_body(content = LoginRequest, description = "Request Body"),
    responses(
        (status=200, description= "Authenticated", body= GenericResponse<AuthData>),
        (status=400, description= "Bad credentials or inactive user", body= EmptyGenericResponse),
    )
)]
#[tracing::instrument(err, name = "Authenticate User", skip(pool, body, secret_obj), fields(email = %body.email, user_id = tracing::field::Empty))]
pub async fn login(
    body: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    secret_obj: web::Data<SecretSetting>,
) -> Result<web::Json<GenericResponse<AuthData>>, GenericError> {
    let user_id = validate_user_credentials(&pool, body.into_inner()).await?;
    tracing::Span::current().record("user_id", tracing::field::display(&user_id));
    update_last_login(&pool, user_id).await?;
    let user = fetch_user_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| GenericError::UnexpectedCustomError("Internal Server Error".to_string()))?;
    let auth_obj = get_auth_data(user.into_schema(), &secret_obj.jwt)?;
    Ok(web::Json(GenericResponse::success(
        "Successfully Authenticated User",
        Some(auth_obj),
    )))
}

#[utoipa::path(
    get,
    path = "/user/admin/list",
    tag = "User Admin",
    responses(
        (status=200, description= "All users", body= GenericResponse<Vec<UserAccount>>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Admin user list API", skip(pool))]
pub async fn admin_list_users(
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<Vec<UserAccount>>>, GenericError> {
    let users = fetch_users(&pool)
        .await?
        .into_iter()
        .map(|u| u.into_schema())
        .collect();
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched users",
        Some(users),
    )))
}

#[utoipa::path(
    patch,
    path = "/user/admin/{id}",
    tag = "User Admin",
    request_body(content = AdminUserUpdateRequest, description = "Fields to change"),
    responses(
        (status=200, description= "Updated user", body= GenericResponse<UserAccount>),
        (status=404, description= "No such user", body= EmptyGenericResponse),
    ),
    params(
        ("id" = i64, Path, description = "User id"),
        ("Authorization" = String, Header, description = "JWT token of an admin"),
    )
)]
#[tracing::instrument(err, name = "Admin user update API", skip(pool, body))]
pub async fn admin_update_user(
    path: web::Path<i64>,
    body: web::Json<AdminUserUpdateRequest>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<UserAccount>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;
    let user = update_user_by_admin(&pool, path.into_inner(), &body)
        .await?
        .ok_or_else(|| GenericError::DataNotFound("User not exists".to_string()))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated user",
        Some(user.into_schema()),
    )))
}
