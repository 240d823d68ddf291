pub(crate) mod errors;
pub(crate) mod handlers;
mod routes;
pub(crate) mod schemas;
pub(crate) mod utils;
pub use routes::payment_route;
pub use schemas::NotificationPolicy;
