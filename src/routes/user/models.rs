use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct UserAccountModel {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct UserCredentialModel {
    pub id: i64,
    pub password: String,
    pub is_active: bool,
}

#[derive(Debug, FromRow)]
pub struct UserOtpModel {
    pub id: i64,
    pub otp: String,
    pub created_on: DateTime<Utc>,
}
