use crate::domain::{deserialize_email_object, EmailObject};
use crate::errors::GenericError;
use actix_web::{FromRequest, HttpMessage};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateUserAccount {
    #[schema(value_type = String)]
    #[serde(deserialize_with = "deserialize_email_object")]
    pub email: EmailObject,
    #[schema(value_type = String)]
    pub password: SecretString,
    #[schema(value_type = String)]
    pub confirm_password: SecretString,
    #[validate(length(max = 100, message = "First name is too long"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name is too long"))]
    pub last_name: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VerifyOtpRequest {
    #[schema(value_type = String)]
    #[serde(deserialize_with = "deserialize_email_object")]
    pub email: EmailObject,
    pub otp: String,
}

#[derive(Deserialize, Debug, utoipa::IntoParams)]
pub struct ResendOtpQuery {
    #[param(value_type = String)]
    #[serde(deserialize_with = "deserialize_email_object")]
    pub email: EmailObject,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    #[schema(value_type = String)]
    #[serde(deserialize_with = "deserialize_email_object")]
    pub email: EmailObject,
    #[schema(value_type = String)]
    pub password: SecretString,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct AdminUserUpdateRequest {
    #[validate(length(max = 100, message = "First name is too long"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name is too long"))]
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

/// The authenticated caller, placed in request extensions by `RequireAuth`.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UserAccount {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_on: DateTime<Utc>,
}

impl FromRequest for UserAccount {
    type Error = GenericError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_http::Payload,
    ) -> Self::Future {
        let value = req.extensions().get::<UserAccount>().cloned();

        let result = match value {
            Some(user) => Ok(user),
            None => Err(GenericError::UnexpectedCustomError(
                "Something went wrong while parsing user account detail".to_string(),
            )),
        };

        ready(result)
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct AuthData {
    pub access_token: String,
    pub token_type: String,
    pub user: UserAccount,
}
