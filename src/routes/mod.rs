pub mod cart;
pub mod order;
pub mod payment;
pub mod pincode;
pub mod product;
mod route;
pub mod user;
pub mod util;

pub use cart::cart_route;
pub use order::order_route;
pub use payment::payment_route;
pub use pincode::pincode_route;
pub use product::product_route;
pub use route::main_route;
pub use user::{user_route, RequireAuth};
pub use util::util_route;
