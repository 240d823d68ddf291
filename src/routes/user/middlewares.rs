use actix_http::Payload;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http, web, Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;

use super::schemas::UserAccount;
use super::utils::fetch_user_by_id;
use crate::configuration::SecretSetting;
use crate::errors::GenericError;
use crate::utils::{bearer_token, decode_token, get_header_value};

/// Resolves the bearer token of a request to an active user account.
#[tracing::instrument(name = "Authenticate request", skip(req))]
pub async fn authenticate_request(req: &HttpRequest) -> Result<UserAccount, GenericError> {
    let token = get_header_value(req, http::header::AUTHORIZATION.as_str())
        .and_then(bearer_token)
        .ok_or_else(|| GenericError::InvalidJWT("Authorization token is missing".to_string()))?
        .to_string();
    let secret_obj = req.app_data::<web::Data<SecretSetting>>().ok_or_else(|| {
        GenericError::UnexpectedCustomError("JWT secret is not configured".to_string())
    })?;
    let user_id = decode_token(token, &secret_obj.jwt.secret)
        .map_err(|e| GenericError::InvalidJWT(e.to_string()))?;

    let db_pool = req.app_data::<web::Data<PgPool>>().ok_or_else(|| {
        GenericError::UnexpectedCustomError("Database pool is not configured".to_string())
    })?;
    let user = fetch_user_by_id(db_pool, user_id)
        .await
        .map_err(GenericError::UnexpectedError)?
        .ok_or_else(|| GenericError::InvalidJWT("User doesn't exist".to_string()))?;
    if !user.is_active {
        return Err(GenericError::InvalidJWT("User is not active".to_string()));
    }
    Ok(user.into_schema())
}

pub struct AuthMiddleware<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<actix_web::body::BoxBody>, Error = Error>
        + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        Box::pin(async move {
            let authenticated = authenticate_request(req.request()).await;
            match authenticated {
                Ok(user) => {
                    req.extensions_mut().insert::<UserAccount>(user);
                    let res = srv.call(req).await?;
                    Ok(res)
                }
                Err(json_error) => {
                    let (request, _pl) = req.into_parts();
                    Ok(ServiceResponse::from_err(json_error, request))
                }
            }
        })
    }
}

/// Middleware factory for requiring authentication.
pub struct RequireAuth;

impl<S> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<actix_web::body::BoxBody>, Error = Error>
        + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

fn insufficient_privilege() -> GenericError {
    GenericError::InsufficientPrivilegeError(
        "Insufficient privilege to access this resource".to_string(),
    )
}

/// Rejects callers without admin rights. Must run after `RequireAuth`.
pub struct AdminMiddleware<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AdminMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<actix_web::body::BoxBody>, Error = Error>
        + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let is_admin = req
            .extensions()
            .get::<UserAccount>()
            .map(|user| user.is_admin);
        match is_admin {
            Some(true) => {
                let srv = Rc::clone(&self.service);
                Box::pin(async move {
                    let res = srv.call(req).await?;
                    Ok(res)
                })
            }
            Some(false) => {
                let (request, _pl) = req.into_parts();
                Box::pin(async { Ok(ServiceResponse::from_err(insufficient_privilege(), request)) })
            }
            None => {
                let (request, _pl) = req.into_parts();
                let json_error =
                    GenericError::ValidationError("User Account doesn't exist".to_string());
                Box::pin(async { Ok(ServiceResponse::from_err(json_error, request)) })
            }
        }
    }
}

pub struct AdminValidation;

impl<S> Transform<S, ServiceRequest> for AdminValidation
where
    S: Service<ServiceRequest, Response = ServiceResponse<actix_web::body::BoxBody>, Error = Error>
        + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AdminMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Admin caller extracted per handler, for resources whose methods do not
/// share one access level.
#[derive(Debug, Clone)]
pub struct AdminAccount(pub UserAccount);

impl FromRequest for AdminAccount {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let cached = req.extensions().get::<UserAccount>().cloned();
            let user = match cached {
                Some(user) => user,
                None => authenticate_request(&req).await?,
            };
            if !user.is_admin {
                return Err(insufficient_privilege());
            }
            Ok(AdminAccount(user))
        })
    }
}
