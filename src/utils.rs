use crate::errors::CustomJWTTokenError;
use crate::schemas::JWTClaims;
use actix_web::HttpRequest;
use actix_web::rt::task::JoinHandle;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm as JWTAlgorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    actix_web::rt::task::spawn_blocking(move || current_span.in_scope(f))
}

pub fn get_header_value<'a>(req: &'a HttpRequest, header_name: &str) -> Option<&'a str> {
    req.headers().get(header_name).and_then(|h| h.to_str().ok())
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[tracing::instrument(name = "Generate JWT token for user", skip(secret))]
pub fn generate_jwt_token_for_user(
    user_id: i64,
    expiry_time: i64,
    secret: &SecretString,
) -> Result<SecretString, anyhow::Error> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(expiry_time))
        .ok_or_else(|| anyhow::anyhow!("Token expiry is out of range"))?
        .timestamp() as usize;
    let claims: JWTClaims = JWTClaims {
        sub: user_id,
        exp: expiration,
    };
    let header = Header::new(JWTAlgorithm::HS256);
    let encoding_key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    let token: String = encode(&header, &claims, &encoding_key)?;
    Ok(SecretString::from(token))
}

#[tracing::instrument(name = "Decode JWT token", skip(token, secret))]
pub fn decode_token<T: Into<String>>(
    token: T,
    secret: &SecretString,
) -> Result<i64, CustomJWTTokenError> {
    let decoding_key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let decoded = decode::<JWTClaims>(
        &token.into(),
        &decoding_key,
        &Validation::new(JWTAlgorithm::HS256),
    );
    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(CustomJWTTokenError::Expired),
            _ => Err(CustomJWTTokenError::Invalid("Invalid Token".to_string())),
        },
    }
}

/// Postgres SQLSTATE 23505.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_error) if db_error.is_unique_violation())
}

/// Postgres SQLSTATE 23503.
pub fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_error) if db_error.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::{bearer_token, decode_token, generate_jwt_token_for_user};
    use crate::errors::CustomJWTTokenError;
    use secrecy::{ExposeSecret, SecretString};

    #[test]
    fn test_jwt_round_trip_keeps_user_id() {
        let secret = SecretString::from("unit-test-secret".to_string());
        let token = generate_jwt_token_for_user(42, 1, &secret).unwrap();
        let user_id = decode_token(token.expose_secret(), &secret).unwrap();
        assert_eq!(user_id, 42);
    }

    #[test]
    fn test_jwt_signed_with_other_secret_is_rejected() {
        let secret = SecretString::from("unit-test-secret".to_string());
        let other = SecretString::from("another-secret".to_string());
        let token = generate_jwt_token_for_user(42, 1, &secret).unwrap();
        let res = decode_token(token.expose_secret(), &other);
        assert!(matches!(res, Err(CustomJWTTokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_jwt_is_reported_as_expired() {
        let secret = SecretString::from("unit-test-secret".to_string());
        let token = generate_jwt_token_for_user(42, -2, &secret).unwrap();
        let res = decode_token(token.expose_secret(), &secret);
        assert!(matches!(res, Err(CustomJWTTokenError::Expired)));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }
}
