use crate::configuration::{SecretSetting, Settings, UserSettings};
use crate::database::get_connection_pool;
use crate::email_client::{DummyEmailClient, GenericEmailService, SmtpEmailClient};
use crate::errors::GenericError;
use crate::payment_client::{PaymentGateway, PaymentServiceClient};
use crate::routes::main_route;
use crate::routes::payment::NotificationPolicy;
use crate::store::{CommerceStore, PgCommerceStore};

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

/// Everything the handlers pull out of the app data.
struct AppState {
    db_pool: PgPool,
    store: Arc<dyn CommerceStore>,
    email_client: Arc<dyn GenericEmailService>,
    gateway: Arc<dyn PaymentGateway>,
    secret: SecretSetting,
    user_setting: UserSettings,
    policy: NotificationPolicy,
    workers: usize,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let store: Arc<dyn CommerceStore> =
            Arc::new(PgCommerceStore::new(connection_pool.clone()));
        let email_client: Arc<dyn GenericEmailService> =
            match SmtpEmailClient::new(&configuration.email) {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    tracing::warn!("SMTP client unavailable, mails are dropped: {:?}", e);
                    Arc::new(DummyEmailClient::new())
                }
            };
        let gateway: Arc<dyn PaymentGateway> =
            Arc::new(PaymentServiceClient::new(&configuration.payment)?);
        let policy = NotificationPolicy {
            cancel_orders_on_failure: configuration.payment.cancel_orders_on_failure,
            email_timeout: configuration.email.timeout(),
        };

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        tracing::info!("Listening on {}:{}", configuration.application.host, port);
        let server = run(
            listener,
            AppState {
                db_pool: connection_pool,
                store,
                email_client,
                gateway,
                secret: configuration.secret,
                user_setting: configuration.user,
                policy,
                workers: configuration.application.workers,
            },
        )?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(listener: TcpListener, state: AppState) -> Result<Server, anyhow::Error> {
    let db_pool = web::Data::new(state.db_pool);
    let store: web::Data<dyn CommerceStore> = web::Data::from(state.store);
    let email_client: web::Data<dyn GenericEmailService> = web::Data::from(state.email_client);
    let gateway: web::Data<dyn PaymentGateway> = web::Data::from(state.gateway);
    let secret_obj = web::Data::new(state.secret);
    let user_setting_obj = web::Data::new(state.user_setting);
    let policy = web::Data::new(state.policy);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                GenericError::ValidationError(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                GenericError::ValidationError(err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                GenericError::ValidationError(err.to_string()).into()
            }))
            .app_data(db_pool.clone())
            .app_data(store.clone())
            .app_data(email_client.clone())
            .app_data(gateway.clone())
            .app_data(secret_obj.clone())
            .app_data(user_setting_obj.clone())
            .app_data(policy.clone())
            .configure(main_route)
    })
    .workers(state.workers)
    .listen(listener)?
    .run();

    Ok(server)
}
