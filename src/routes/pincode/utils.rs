use super::schemas::{PincodeData, PincodeRequest};
use crate::errors::GenericError;
use crate::utils::is_unique_violation;
use anyhow::Context;
use sqlx::PgPool;

#[tracing::instrument(name = "Save pincode", skip(pool))]
pub async fn save_pincode(pool: &PgPool, request: &PincodeRequest) -> Result<(), GenericError> {
    sqlx::query("INSERT INTO pincode (pincode, active) VALUES ($1, $2)")
        .bind(request.pincode.trim())
        .bind(request.active)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return GenericError::ValidationError("Pincode already exists".to_string());
            }
            tracing::error!("Failed to execute query: {:?}", e);
            GenericError::DatabaseError(
                "A database failure occurred while saving pincode".to_string(),
                e.into(),
            )
        })?;
    Ok(())
}

#[tracing::instrument(name = "Fetch pincodes", skip(pool))]
pub async fn fetch_pincodes(pool: &PgPool) -> Result<Vec<PincodeData>, anyhow::Error> {
    let pincodes =
        sqlx::query_as::<_, PincodeData>("SELECT id, pincode, active FROM pincode ORDER BY id")
            .fetch_all(pool)
            .await
            .context("A database failure occurred while fetching pincodes")?;
    Ok(pincodes)
}

#[tracing::instrument(name = "Check pincode delivery", skip(pool))]
pub async fn is_pincode_serviceable(pool: &PgPool, pincode: &str) -> Result<bool, anyhow::Error> {
    let available = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM pincode WHERE pincode = $1 AND active = TRUE)",
    )
    .bind(pincode.trim())
    .fetch_one(pool)
    .await
    .context("A database failure occurred while checking pincode")?;
    Ok(available)
}
