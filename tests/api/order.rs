use crate::helpers::spawn_app;
use serde_json::json;

#[actix_web::test]
async fn checkout_without_token_is_unauthorized() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/order/checkout", &app.address))
        .json(&json!({"customer_phone": "9999999999", "address": "X"}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["code"], "401");
}

#[actix_web::test]
async fn checkout_with_garbage_token_is_unauthorized() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/order/checkout", &app.address))
        .bearer_auth("not-a-jwt")
        .json(&json!({"customer_phone": "9999999999", "address": "X"}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn admin_order_routes_require_a_token() {
    let app = spawn_app().await;

    for path in ["/order/admin/list", "/order/admin/count", "/order/admin/1", "/order/list"] {
        let response = app
            .api_client
            .get(format!("{}{}", &app.address, path))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(response.status().as_u16(), 401, "{} should need a token", path);
    }
}
