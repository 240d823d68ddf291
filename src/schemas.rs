use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct GenericResponse<D> {
    pub status: bool,
    pub customer_message: String,
    pub code: String,
    pub data: Option<D>,
}

impl<D> GenericResponse<D> {
    pub fn success(message: &str, data: Option<D>) -> Self {
        Self {
            status: true,
            customer_message: String::from(message),
            code: String::from("200"),
            data,
        }
    }

    pub fn error(message: &str, code: &str, data: Option<D>) -> Self {
        Self {
            status: false,
            customer_message: String::from(message),
            code: String::from(code),
            data,
        }
    }
}

/// Shape of the responses that carry no data, for the API docs.
#[derive(Serialize, Debug, ToSchema)]
pub struct EmptyGenericResponse {
    pub status: bool,
    pub customer_message: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JWTClaims {
    pub sub: i64,
    pub exp: usize,
}
