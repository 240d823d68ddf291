use once_cell::sync::Lazy;
use sqlx::PgPool;
use storefront_commerce::{
    configuration::get_configuration,
    database::get_connection_pool,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[allow(dead_code)]
pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub port: u16,
    pub api_client: reqwest::Client,
}

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// Starts the server on a random port. The pool connects lazily, so routes
/// that never reach the database work without Postgres.
pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.application.host = "127.0.0.1".to_string();
    configuration.application.port = 0;
    configuration.application.workers = 1;
    let db_pool = get_connection_pool(&configuration.database);

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        db_pool,
        port,
        api_client: reqwest::Client::new(),
    }
}
