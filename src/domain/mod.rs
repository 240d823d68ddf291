pub mod email_object;
pub use email_object::{deserialize_email_object, EmailObject};
