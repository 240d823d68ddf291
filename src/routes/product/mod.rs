pub(crate) mod errors;
pub(crate) mod handlers;
mod models;
mod routes;
pub(crate) mod schemas;
pub(crate) mod utils;
pub use routes::product_route;
