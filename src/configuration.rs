use crate::domain::EmailObject;
use config::{self, ConfigError, Environment};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::ConnectOptions;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub name: String,
    pub acquire_timeout: u64,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn without_db(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(PgSslMode::Prefer)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db()
            .database(&self.name)
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
    pub sender: String,
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<EmailObject, String> {
        EmailObject::parse(self.sender.to_owned())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Debug, Deserialize)]
pub struct JWT {
    pub secret: SecretString,
    /// Token lifetime in hours.
    pub expiry: i64,
}

#[derive(Debug, Deserialize)]
pub struct SecretSetting {
    pub jwt: JWT,
}

#[derive(Debug, Deserialize)]
pub struct PaymentSettings {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub api_version: String,
    pub currency: String,
    pub return_url: String,
    pub notify_url: String,
    pub timeout_milliseconds: u64,
    /// What happens to the orders of a payment the gateway reports as failed.
    /// `true` cancels them, `false` leaves them pending for another attempt.
    pub cancel_orders_on_failure: bool,
}

impl PaymentSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Debug, Deserialize)]
pub struct UserSettings {
    pub otp_validity_minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseConfig,
    pub email: EmailClientSettings,
    pub secret: SecretSetting,
    pub payment: PaymentSettings,
    pub user: UserSettings,
}

/// Reads `configuration/configuration.yaml` and lets `APP_`-prefixed
/// environment variables override it, e.g. `APP_DATABASE__PASSWORD`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");
    let builder = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("configuration.yaml"),
        ))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    builder.try_deserialize::<Settings>()
}
