use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct PincodeRequest {
    #[validate(length(min = 3, max = 12, message = "Pincode must be 3-12 characters"))]
    pub pincode: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Serialize, Debug, ToSchema, FromRow)]
pub struct PincodeData {
    pub id: i64,
    pub pincode: String,
    pub active: bool,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PincodeAvailability {
    pub available: bool,
}
