pub(crate) mod handlers;
mod routes;
pub(crate) mod schemas;
#[cfg(test)]
mod tests;
pub(crate) mod utils;
pub use routes::cart_route;
