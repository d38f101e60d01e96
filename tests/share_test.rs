//! Integration tests for token-scoped public access.

mod helpers;

use axum::http::StatusCode;

async fn issue_token(app: &helpers::TestApp, token: &str, client_id: &str) -> String {
    let response = app
        .request(
            "POST",
            &format!("/api/clients/{client_id}/share-token"),
            None,
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let share = response.body["data"]["token"]
        .as_str()
        .expect("share token")
        .to_string();
    assert_eq!(share.len(), 64);
    assert!(
        response.body["data"]["url"]
            .as_str()
            .expect("share url")
            .ends_with(&share)
    );
    share
}

#[tokio::test]
async fn test_public_listing_is_scoped_to_one_client() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    let acme = app.create_client(&token, "Acme", "acme@test.com").await;
    let globex = app.create_client(&token, "Globex", "globex@test.com").await;
    app.create_note(&token, &acme).await;
    app.create_note(&token, &acme).await;
    let foreign = app.create_note(&token, &globex).await;
    let foreign_id = foreign.body["data"]["id"].as_str().expect("note id").to_string();

    let share = issue_token(&app, &token, &acme).await;

    let response = app
        .request("GET", &format!("/api/public/{share}/notes"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["client"]["name"], "Acme");
    assert!(response.body["data"]["client"]["share_token"].is_null());
    assert_eq!(
        response.body["data"]["notes"].as_array().map(Vec::len),
        Some(2)
    );

    // A foreign note, a missing note and a malformed id all look the same.
    let paths = [
        format!("/api/public/{share}/notes/{foreign_id}/document"),
        format!(
            "/api/public/{share}/notes/{}/document",
            uuid::Uuid::now_v7()
        ),
        format!("/api/public/{share}/notes/not-an-id/document"),
    ];
    for path in &paths {
        let response = app.request("GET", path, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(response.body["message"], "Not found");
    }
}

#[tokio::test]
async fn test_public_document_for_own_note() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    let acme = app.create_client(&token, "Acme", "acme@test.com").await;
    let created = app.create_note(&token, &acme).await;
    let id = created.body["data"]["id"].as_str().expect("note id").to_string();
    let share = issue_token(&app, &token, &acme).await;

    let response = app
        .raw_request(
            "GET",
            &format!("/api/public/{share}/notes/{id}/document"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&response.bytes).expect("json");
    assert_eq!(body["note"]["id"], id.as_str());
    assert!(body["client"]["share_token"].is_null());
}

#[tokio::test]
async fn test_regenerated_token_replaces_old_one() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    let acme = app.create_client(&token, "Acme", "acme@test.com").await;

    let first = issue_token(&app, &token, &acme).await;
    let second = issue_token(&app, &token, &acme).await;
    assert_ne!(first, second);

    let response = app
        .request("GET", &format!("/api/public/{first}/notes"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app
        .request("GET", &format!("/api/public/{second}/notes"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
