use super::errors::{AuthError, OtpVerificationError, UserRegistrationError};
use super::models::{UserAccountModel, UserCredentialModel, UserOtpModel};
use super::schemas::{AdminUserUpdateRequest, AuthData, CreateUserAccount, LoginRequest, UserAccount};
use crate::configuration::JWT;
use crate::email_client::{otp_email_body, GenericEmailService};
use crate::utils::{generate_jwt_token_for_user, is_unique_violation, spawn_blocking_with_tracing};
use anyhow::Context;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use chrono::{DateTime, Datelike, Duration, Utc};
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, is_active, is_admin, last_login, created_on";

impl UserAccountModel {
    pub fn into_schema(self) -> UserAccount {
        UserAccount {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            is_active: self.is_active,
            is_admin: self.is_admin,
            last_login: self.last_login,
            created_on: self.created_on,
        }
    }
}

pub fn compute_password_hash(password: SecretString) -> Result<SecretString, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).map_err(|e| anyhow::anyhow!(e))?,
    )
    .hash_password(password.expose_secret().as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!(e))?
    .to_string();
    Ok(SecretString::from(password_hash))
}

#[tracing::instrument(name = "Verify password hash", skip(expected_password_hash, password_candidate))]
pub fn verify_password_hash(
    expected_password_hash: SecretString,
    password_candidate: SecretString,
) -> Result<(), AuthError> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to parse hash in PHC string format.")?;

    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .map_err(|e| anyhow::anyhow!(e))
        .context("Invalid password.")
        .map_err(AuthError::InvalidPassword)
}

pub fn generate_otp() -> String {
    rand::rng().random_range(100000..=999999).to_string()
}

/// Decides whether `otp` unlocks the latest active OTP record of an email.
pub fn check_otp(
    record: Option<&UserOtpModel>,
    otp: &str,
    now: DateTime<Utc>,
    validity: Duration,
) -> Result<(), OtpVerificationError> {
    let record = record.ok_or(OtpVerificationError::NoActiveOtp)?;
    if record.otp != otp.trim() {
        return Err(OtpVerificationError::InvalidOtp);
    }
    if now - record.created_on > validity {
        return Err(OtpVerificationError::Expired);
    }
    Ok(())
}

#[tracing::instrument(name = "Fetch user by id", skip(pool))]
pub async fn fetch_user_by_id(
    pool: &PgPool,
    user_id: i64,
) -> Result<Option<UserAccountModel>, anyhow::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM user_account WHERE id = $1");
    let user = sqlx::query_as::<_, UserAccountModel>(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching user")
        })?;
    Ok(user)
}

#[tracing::instrument(name = "Fetch user by email", skip(pool))]
pub async fn fetch_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserAccountModel>, anyhow::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM user_account WHERE email = $1");
    let user = sqlx::query_as::<_, UserAccountModel>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching user")
        })?;
    Ok(user)
}

#[tracing::instrument(name = "Get stored credentials", skip(pool))]
async fn fetch_user_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserCredentialModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, UserCredentialModel>(
        "SELECT id, password, is_active FROM user_account WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .context("Failed to perform a query to retrieve stored credentials.")?;
    Ok(row)
}

#[tracing::instrument(name = "Register user", skip(pool, user_account), fields(email = %user_account.email))]
pub async fn register_user(
    pool: &PgPool,
    user_account: CreateUserAccount,
) -> Result<i64, UserRegistrationError> {
    if user_account.password.expose_secret() != user_account.confirm_password.expose_secret() {
        return Err(UserRegistrationError::PasswordMismatch);
    }
    if fetch_user_by_email(pool, user_account.email.get())
        .await?
        .is_some()
    {
        return Err(UserRegistrationError::DuplicateEmail);
    }
    let password = user_account.password;
    let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("Failed to spawn blocking task.")??;

    let user_id = sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO user_account (email, password, first_name, last_name, is_active, is_admin)
        VALUES ($1, $2, $3, $4, FALSE, FALSE)
        RETURNING id"#,
    )
    .bind(user_account.email.get())
    .bind(password_hash.expose_secret())
    .bind(&user_account.first_name)
    .bind(&user_account.last_name)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return UserRegistrationError::DuplicateEmail;
        }
        tracing::error!("Failed to execute query: {:?}", e);
        UserRegistrationError::DatabaseError(
            "A database failure occurred while saving user account".to_string(),
            e.into(),
        )
    })?;
    Ok(user_id)
}

/// Expires every active OTP of the email and stores a fresh one, atomically.
#[tracing::instrument(name = "Issue OTP", skip(pool))]
pub async fn issue_otp(pool: &PgPool, email: &str) -> Result<String, anyhow::Error> {
    let otp = generate_otp();
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    sqlx::query("UPDATE user_otp SET expired = TRUE WHERE email = $1 AND expired = FALSE")
        .bind(email)
        .execute(&mut *transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute update query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while expiring OTPs")
        })?;
    sqlx::query("INSERT INTO user_otp (email, otp, expired) VALUES ($1, $2, FALSE)")
        .bind(email)
        .bind(&otp)
        .execute(&mut *transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while saving OTP")
        })?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store an OTP")?;
    Ok(otp)
}

#[tracing::instrument(name = "Fetch active OTP", skip(pool))]
pub async fn fetch_latest_active_otp(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserOtpModel>, anyhow::Error> {
    let otp = sqlx::query_as::<_, UserOtpModel>(
        r#"SELECT id, otp, created_on FROM user_otp
        WHERE email = $1 AND expired = FALSE
        ORDER BY created_on DESC, id DESC
        LIMIT 1"#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching OTP")
    })?;
    Ok(otp)
}

#[tracing::instrument(name = "Expire OTP", skip(pool))]
pub async fn expire_otp(pool: &PgPool, otp_id: i64) -> Result<(), anyhow::Error> {
    sqlx::query("UPDATE user_otp SET expired = TRUE WHERE id = $1")
        .bind(otp_id)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute update query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while expiring OTP")
        })?;
    Ok(())
}

#[tracing::instrument(name = "Consume OTP and activate user", skip(pool))]
async fn consume_otp_and_activate(
    pool: &PgPool,
    otp_id: i64,
    email: &str,
) -> Result<(), anyhow::Error> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    sqlx::query("UPDATE user_otp SET expired = TRUE WHERE id = $1")
        .bind(otp_id)
        .execute(&mut *transaction)
        .await
        .context("A database failure occurred while expiring OTP")?;
    sqlx::query("UPDATE user_account SET is_active = TRUE WHERE email = $1")
        .bind(email)
        .execute(&mut *transaction)
        .await
        .context("A database failure occurred while activating user")?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to activate a user")?;
    Ok(())
}

/// Outcome of an OTP verification attempt. Database failures are kept apart
/// from the rejections a user can act on.
pub enum OtpCheck {
    Verified,
    Rejected(OtpVerificationError),
}

#[tracing::instrument(name = "Verify OTP", skip(pool, otp))]
pub async fn verify_user_otp(
    pool: &PgPool,
    email: &str,
    otp: &str,
    validity: Duration,
) -> Result<OtpCheck, anyhow::Error> {
    let record = fetch_latest_active_otp(pool, email).await?;
    match check_otp(record.as_ref(), otp, Utc::now(), validity) {
        Ok(()) => {
            if let Some(record) = record {
                consume_otp_and_activate(pool, record.id, email).await?;
            }
            Ok(OtpCheck::Verified)
        }
        Err(OtpVerificationError::Expired) => {
            if let Some(record) = record {
                expire_otp(pool, record.id).await?;
            }
            Ok(OtpCheck::Rejected(OtpVerificationError::Expired))
        }
        Err(e) => Ok(OtpCheck::Rejected(e)),
    }
}

#[tracing::instrument(name = "Send OTP email", skip(email_client, otp))]
pub async fn send_otp_email(
    email_client: &dyn GenericEmailService,
    email: &str,
    otp: &str,
) -> Result<(), anyhow::Error> {
    email_client
        .send_html_email(
            email,
            "Verify your email",
            otp_email_body(otp, Utc::now().year()),
        )
        .await
}

#[tracing::instrument(name = "Validate credentials", skip(credentials, pool), fields(email = %credentials.email))]
pub async fn validate_user_credentials(
    pool: &PgPool,
    credentials: LoginRequest,
) -> Result<i64, AuthError> {
    let stored = fetch_user_credentials(pool, credentials.email.get())
        .await?
        .ok_or(AuthError::UnknownEmail)?;
    let expected_password_hash = SecretString::from(stored.password);
    let password = credentials.password;
    spawn_blocking_with_tracing(move || verify_password_hash(expected_password_hash, password))
        .await
        .context("Failed to spawn blocking task.")??;
    if !stored.is_active {
        return Err(AuthError::InactiveUser);
    }
    Ok(stored.id)
}

#[tracing::instrument(name = "Update last login", skip(pool))]
pub async fn update_last_login(pool: &PgPool, user_id: i64) -> Result<(), anyhow::Error> {
    sqlx::query("UPDATE user_account SET last_login = now() WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute update query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while updating last login")
        })?;
    Ok(())
}

pub fn get_auth_data(user: UserAccount, jwt: &JWT) -> Result<AuthData, anyhow::Error> {
    let token = generate_jwt_token_for_user(user.id, jwt.expiry, &jwt.secret)?;
    Ok(AuthData {
        access_token: token.expose_secret().to_string(),
        token_type: "bearer".to_string(),
        user,
    })
}

#[tracing::instrument(name = "Fetch users", skip(pool))]
pub async fn fetch_users(pool: &PgPool) -> Result<Vec<UserAccountModel>, anyhow::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM user_account ORDER BY id");
    let users = sqlx::query_as::<_, UserAccountModel>(&query)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching users")
        })?;
    Ok(users)
}

/// Applies the fields present in the request; absent fields stay untouched.
#[tracing::instrument(name = "Update user by admin", skip(pool))]
pub async fn update_user_by_admin(
    pool: &PgPool,
    user_id: i64,
    update: &AdminUserUpdateRequest,
) -> Result<Option<UserAccountModel>, anyhow::Error> {
    let query = format!(
        r#"UPDATE user_account SET
        first_name = COALESCE($2, first_name),
        last_name = COALESCE($3, last_name),
        is_active = COALESCE($4, is_active),
        is_admin = COALESCE($5, is_admin)
        WHERE id = $1
        RETURNING {USER_COLUMNS}"#
    );
    let user = sqlx::query_as::<_, UserAccountModel>(&query)
        .bind(user_id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(update.is_active)
        .bind(update.is_admin)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute update query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while updating user")
        })?;
    Ok(user)
}

/// Grants admin rights. Returns `false` when no account has the email.
#[tracing::instrument(name = "Promote admin", skip(pool))]
pub async fn promote_admin(pool: &PgPool, email: &str) -> Result<bool, anyhow::Error> {
    let result = sqlx::query("UPDATE user_account SET is_admin = TRUE WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await
        .context("A database failure occurred while promoting admin")?;
    Ok(result.rows_affected() > 0)
}
