pub mod commands;
pub mod configuration;
pub mod database;
pub mod domain;
pub mod email_client;
pub mod errors;
pub mod openapi;
pub mod payment_client;
pub mod routes;
pub mod schemas;
pub mod startup;
pub mod store;
pub mod telemetry;
mod tests;
pub mod utils;
