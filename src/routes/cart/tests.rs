#[cfg(test)]
mod tests {
    use crate::routes::cart::schemas::AddToCartRequest;
    use crate::routes::cart::utils::cart_total;
    use crate::tests::tests::amount;
    use bigdecimal::BigDecimal;
    use validator::Validate;

    #[test]
    fn test_cart_total() {
        let dates = amount("120.00");
        let honey = amount("80.25");
        let empty: Vec<(&BigDecimal, i32)> = vec![];
        assert_eq!(cart_total(empty), amount("0"));
        assert_eq!(
            cart_total(vec![(&dates, 2), (&honey, 1)]),
            amount("320.25")
        );
    }

    #[test]
    fn test_add_to_cart_quantity_defaults_to_one() {
        let request: AddToCartRequest = serde_json::from_str(r#"{"product_id": 7}"#).unwrap();
        assert_eq!(request.quantity, 1);
        assert!(request.validate().is_ok());

        let request: AddToCartRequest =
            serde_json::from_str(r#"{"product_id": 7, "quantity": 0}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
