use crate::helpers::spawn_app;
use serde_json::json;

#[actix_web::test]
async fn register_with_invalid_email_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/user/register", &app.address))
        .json(&json!({
            "email": "not-an-email",
            "password": "abc12345",
            "confirm_password": "abc12345"
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["code"], "400");
}
