#[cfg(test)]
mod tests {
    use crate::payment_client::{DummyPaymentGateway, FailingPaymentGateway};
    use crate::routes::order::errors::CheckoutError;
    use crate::routes::order::schemas::CheckoutRequest;
    use crate::routes::order::utils::{fetch_admin_orders, process_checkout, validate_cart_lines};
    use crate::store::{CartLine, CommerceStore, OrderStatus, PaymentStatus};
    use crate::tests::tests::{amount, get_dummy_user_account, get_test_pool, InMemoryCommerceStore};
    use std::sync::atomic::Ordering;
    use validator::Validate;

    fn cart_line(product_id: i64, quantity: i32, in_stock: i32) -> CartLine {
        CartLine {
            product_id,
            quantity,
            product_name: Some(format!("Product {}", product_id)),
            sale_price: Some(amount("125.50")),
            is_available: Some(true),
            in_stock: Some(in_stock),
        }
    }

    fn checkout_request() -> CheckoutRequest {
        CheckoutRequest {
            customer_phone: "9999999999".to_string(),
            address: "X".to_string(),
        }
    }

    #[test]
    fn test_validate_cart_lines() {
        assert!(matches!(
            validate_cart_lines(&[]),
            Err(CheckoutError::EmptyCart)
        ));

        let mut missing = cart_line(3, 1, 10);
        missing.sale_price = None;
        missing.product_name = None;
        let err = validate_cart_lines(&[missing]).unwrap_err();
        assert_eq!(err.to_string(), "Product #3 no longer exists");

        let mut unavailable = cart_line(4, 1, 10);
        unavailable.is_available = Some(false);
        let err = validate_cart_lines(&[cart_line(5, 1, 10), unavailable]).unwrap_err();
        assert_eq!(err.to_string(), "Product Product 4 is not available");

        let err = validate_cart_lines(&[cart_line(6, 3, 2)]).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient stock for product Product 6");

        let lines = validate_cart_lines(&[cart_line(7, 2, 2), cart_line(8, 1, 5)]).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].total_amount, amount("251.00"));
        assert_eq!(lines[1].total_amount, amount("125.50"));
    }

    #[test]
    fn test_checkout_request_validation() {
        assert!(checkout_request().validate().is_ok());
        let request = CheckoutRequest {
            customer_phone: "99999-9999".to_string(),
            address: "X".to_string(),
        };
        assert!(request.validate().is_err());
        let request = CheckoutRequest {
            customer_phone: "+919999999999".to_string(),
            address: "".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[tokio::test]
    async fn test_checkout_creates_pending_orders_and_payment() {
        let store = InMemoryCommerceStore::new();
        store.add_product(7, "Dates", "120.00", 10);
        store.add_to_cart(1, 7, 2);
        let gateway = DummyPaymentGateway::new();
        let user = get_dummy_user_account(1, "buyer@example.com");

        let data = process_checkout(&store, &gateway, &user, &checkout_request())
            .await
            .unwrap();

        assert_eq!(gateway.issued(), 1);
        assert_eq!(data.amount, amount("240.00"));
        assert_eq!(data.order_ids.len(), 1);
        assert!(data.session_id.starts_with("session_1_"));
        assert_eq!(store.payment_count(), 1);
        assert_eq!(store.order_statuses(), vec![OrderStatus::Pending]);

        let payment = store.payment(data.payment_id).unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.transaction_ref, data.transaction_ref);
        assert_eq!(payment.customer_phone, "9999999999");
        assert_eq!(payment.address, "X");
        let orders = store.fetch_payment_orders(data.payment_id).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].product_id, 7);
        assert_eq!(orders[0].quantity, 2);
        assert_eq!(orders[0].total_amount, amount("240.00"));
    }

    #[tokio::test]
    async fn test_checkout_of_several_items_links_every_order() {
        let store = InMemoryCommerceStore::new();
        store.add_product(7, "Dates", "120.00", 10);
        store.add_product(8, "Honey", "80.25", 10);
        store.add_to_cart(1, 7, 1);
        store.add_to_cart(1, 8, 2);
        store.add_to_cart(2, 7, 5);
        let gateway = DummyPaymentGateway::new();
        let user = get_dummy_user_account(1, "buyer@example.com");

        let data = process_checkout(&store, &gateway, &user, &checkout_request())
            .await
            .unwrap();

        assert_eq!(data.amount, amount("280.50"));
        let mut linked: Vec<i64> = store
            .fetch_payment_orders(data.payment_id)
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        linked.sort();
        assert_eq!(linked, data.order_ids);
        assert_eq!(store.order_count(), 2);
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_is_rejected() {
        let store = InMemoryCommerceStore::new();
        let gateway = DummyPaymentGateway::new();
        let user = get_dummy_user_account(1, "buyer@example.com");

        let err = process_checkout(&store, &gateway, &user, &checkout_request())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(gateway.issued(), 0);
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.payment_count(), 0);
    }

    #[tokio::test]
    async fn test_checkout_rejects_insufficient_stock_before_writing() {
        let store = InMemoryCommerceStore::new();
        store.add_product(7, "Dates", "120.00", 1);
        store.add_to_cart(1, 7, 2);
        let gateway = DummyPaymentGateway::new();
        let user = get_dummy_user_account(1, "buyer@example.com");

        let err = process_checkout(&store, &gateway, &user, &checkout_request())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::InvalidCart(_)));
        assert_eq!(gateway.issued(), 0);
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn test_checkout_failure_mid_write_leaves_no_rows() {
        let store = InMemoryCommerceStore::new();
        store.add_product(7, "Dates", "120.00", 10);
        store.add_product(8, "Honey", "80.25", 10);
        store.add_to_cart(1, 7, 1);
        store.add_to_cart(1, 8, 1);
        store.fail_checkout_write.store(true, Ordering::SeqCst);
        let gateway = DummyPaymentGateway::new();
        let user = get_dummy_user_account(1, "buyer@example.com");

        let err = process_checkout(&store, &gateway, &user, &checkout_request())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::UnexpectedError(_)));
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.payment_count(), 0);
    }

    #[tokio::test]
    async fn test_checkout_gateway_failure_writes_nothing() {
        let store = InMemoryCommerceStore::new();
        store.add_product(7, "Dates", "120.00", 10);
        store.add_to_cart(1, 7, 1);
        let gateway = FailingPaymentGateway::default();
        let user = get_dummy_user_account(1, "buyer@example.com");

        let err = process_checkout(&store, &gateway, &user, &checkout_request())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::GatewayError(_)));
        assert_eq!(err.to_string(), "Failed to create payment session");
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.payment_count(), 0);
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres"]
    async fn test_admin_order_list_sql() {
        let pool = get_test_pool().await;
        let orders = fetch_admin_orders(&pool, Some(OrderStatus::Pending), 500, -3).await;
        assert!(orders.is_ok());
        assert!(orders.unwrap().len() <= 100);
    }
}
