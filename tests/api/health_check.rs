use crate::helpers::spawn_app;

#[actix_web::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("{}/util/health_check", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], true);
    assert_eq!(body["customer_message"], "Running Server");
}

#[actix_web::test]
async fn openapi_document_is_served() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("{}/api-docs/openapi.json", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["paths"]["/order/checkout"].is_object());
    assert!(body["paths"]["/payment/notification"].is_object());
}
