//! Integration tests for client management.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_client_crud() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;

    let response = app
        .request(
            "POST",
            "/api/clients",
            Some(serde_json::json!({
                "name": "  Acme  ",
                "email": "acme@test.com",
                "rfc": "acm010101abc",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["name"], "Acme");
    assert_eq!(response.body["data"]["rfc"], "ACM010101ABC");
    let id = response.body["data"]["id"].as_str().expect("client id").to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/clients/{id}"),
            Some(serde_json::json!({ "name": "Acme SA", "email": "acme@test.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "Acme SA");

    let response = app
        .request("GET", "/api/clients?search=acme", None, Some(&token))
        .await;
    assert_eq!(response.body["data"]["total_items"], 1);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    app.create_client(&token, "Acme", "acme@test.com").await;

    let response = app
        .request(
            "POST",
            "/api/clients",
            Some(serde_json::json!({ "name": "Other", "email": "acme@test.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_client_with_notes_cannot_be_deleted() {
    let app = helpers::TestApp::new().await;
    let admin = app.admin_token().await;
    let acme = app.create_client(&admin, "Acme", "acme@test.com").await;
    app.create_note(&admin, &acme).await;

    let response = app
        .request("DELETE", &format!("/api/clients/{acme}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request("GET", &format!("/api/clients/{acme}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_client_is_404() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    let response = app
        .request(
            "GET",
            &format!("/api/clients/{}", uuid::Uuid::now_v7()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
