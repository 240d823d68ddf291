#[cfg(test)]
mod tests {
    use crate::routes::pincode::schemas::PincodeRequest;
    use crate::routes::pincode::utils::{is_pincode_serviceable, save_pincode};
    use crate::tests::tests::get_test_pool;
    use validator::Validate;

    #[test]
    fn test_pincode_request_validation() {
        let request: PincodeRequest = serde_json::from_str(r#"{"pincode": "560001"}"#).unwrap();
        assert!(!request.active);
        assert!(request.validate().is_ok());

        let request: PincodeRequest =
            serde_json::from_str(r#"{"pincode": "56", "active": true}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres"]
    async fn test_only_active_pincodes_are_serviceable() {
        let pool = get_test_pool().await;
        let code = format!("{}", chrono::Utc::now().timestamp_micros() % 1_000_000_000);
        let inactive = PincodeRequest {
            pincode: code.clone(),
            active: false,
        };
        save_pincode(&pool, &inactive).await.unwrap();
        assert!(!is_pincode_serviceable(&pool, &code).await.unwrap());
        assert!(save_pincode(&pool, &inactive).await.is_err());
    }
}
