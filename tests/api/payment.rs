use crate::helpers::spawn_app;

#[actix_web::test]
async fn malformed_webhook_is_acknowledged() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/payment/notification", &app.address))
        .header("Content-Type", "application/json")
        .body("{this is not json")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["disposition"], "invalid_payload");
}
