//! Integration tests for note transactions over HTTP.

mod helpers;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn decimal(value: &serde_json::Value) -> Decimal {
    value.as_str().expect("decimal string").parse().expect("decimal")
}

#[tokio::test]
async fn test_create_note_computes_total_and_folio() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    let acme = app.create_client(&token, "Acme", "acme@test.com").await;

    let next = app
        .request("GET", "/api/notes/next-folio", None, Some(&token))
        .await;
    assert_eq!(next.body["data"]["folio"], "000001");

    let response = app
        .request(
            "POST",
            "/api/notes",
            Some(serde_json::json!({
                "client_id": acme,
                "description": "Compra de metal",
                "status": "pendiente",
                "total": "1.00",
                "line_items": [
                    { "article": "CU", "description": "Cobre", "quantity": "2.5", "unit_price": "10.00" },
                    { "article": "AL", "description": "Aluminio", "quantity": "1.0", "unit_price": "5.00" }
                ]
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let note = &response.body["data"];
    assert_eq!(note["folio"], "000001");
    assert_eq!(decimal(&note["total"]), dec!(30.00));
    assert_eq!(note["status"], "pendiente");

    let id = note["id"].as_str().expect("note id");
    let detail = app
        .request("GET", &format!("/api/notes/{id}"), None, Some(&token))
        .await;
    assert_eq!(detail.body["data"]["client"]["name"], "Acme");
    assert_eq!(detail.body["data"]["line_items"][1]["line_no"], 2);
}

#[tokio::test]
async fn test_validation_errors_are_400() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    let acme = app.create_client(&token, "Acme", "acme@test.com").await;

    let response = app
        .request(
            "POST",
            "/api/notes",
            Some(serde_json::json!({ "client_id": acme, "line_items": [] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let response = app
        .request(
            "POST",
            "/api/notes",
            Some(serde_json::json!({
                "client_id": acme,
                "line_items": [{ "description": "Cobre", "quantity": "0", "unit_price": "1" }]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/notes",
            Some(serde_json::json!({
                "client_id": acme,
                "line_items": [{
                    "description": "Cobre",
                    "quantity": "79228162514264337593543950335",
                    "unit_price": "2"
                }]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let next = app
        .request("GET", "/api/notes/next-folio", None, Some(&token))
        .await;
    assert_eq!(next.body["data"]["folio"], "000001");
}

#[tokio::test]
async fn test_secretary_cannot_delete_note() {
    let app = helpers::TestApp::new().await;
    let secretary = app.secretary_token().await;
    let admin = app.admin_token().await;
    let acme = app.create_client(&secretary, "Acme", "acme@test.com").await;
    let created = app.create_note(&secretary, &acme).await;
    let id = created.body["data"]["id"].as_str().expect("note id").to_string();

    let response = app
        .request("DELETE", &format!("/api/notes/{id}"), None, Some(&secretary))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app
        .request("DELETE", &format!("/api/notes/{id}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/notes/{id}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // The deleted folio is not handed out again.
    let again = app.create_note(&secretary, &acme).await;
    assert_eq!(again.body["data"]["folio"], "000002");
}

#[tokio::test]
async fn test_status_toggle_and_listing() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    let acme = app.create_client(&token, "Acme", "acme@test.com").await;
    let created = app.create_note(&token, &acme).await;
    let id = created.body["data"]["id"].as_str().expect("note id").to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/notes/{id}/status"),
            Some(serde_json::json!({ "status": "pagada" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "pagada");

    let paid = app
        .request("GET", "/api/notes?status=pagada", None, Some(&token))
        .await;
    assert_eq!(paid.body["data"]["total_items"], 1);
    let pending = app
        .request("GET", "/api/notes?status=pendiente", None, Some(&token))
        .await;
    assert_eq!(pending.body["data"]["total_items"], 0);
}

#[tokio::test]
async fn test_note_document_download() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    let acme = app.create_client(&token, "Acme", "acme@test.com").await;
    let created = app.create_note(&token, &acme).await;
    let id = created.body["data"]["id"].as_str().expect("note id").to_string();

    let response = app
        .raw_request("GET", &format!("/api/notes/{id}/document"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_slice(&response.bytes).expect("json");
    assert_eq!(body["note"]["folio"], "000001");
}

#[tokio::test]
async fn test_storage_outage_is_503() {
    let app = helpers::TestApp::new().await;
    let token = app.secretary_token().await;
    app.store.set_unavailable(true);

    let response = app.request("GET", "/api/dashboard", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}
