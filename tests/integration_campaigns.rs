mod common;

use axum::http::{Method, StatusCode};
use base64::{Engine, engine::general_purpose::STANDARD};
use common::TestApp;
use serde_json::json;

fn tiny_png_data_url() -> String {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 24]);
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

#[tokio::test]
async fn collection_and_item_routes_do_not_shadow_each_other() {
    let app = TestApp::new();
    let (cookie, id) = app.ngo_with_campaign("ngo@example.org", 1000.0).await;

    let res = app.get("/api/campaigns", Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["campaigns"].as_array().unwrap().len(), 1);

    let res = app.get(&format!("/api/campaigns/{id}"), Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["campaign"]["id"], id.as_str());
    assert_eq!(res.body["campaign"]["raisedAmount"], 0.0);
    assert_eq!(res.body["campaign"]["status"], "active");
}

#[tokio::test]
async fn donors_cannot_create_or_list_campaigns() {
    let app = TestApp::new();
    let (_, donor) = app.register("Ada", "ada@example.org", "donor").await;

    let res = app
        .post(
            "/api/campaigns",
            json!({"title": "T", "description": "D", "goalAmount": 10}),
            Some(&donor),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.message(), "Only NGOs can create campaigns");

    let res = app.get("/api/campaigns", Some(&donor)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.message(), "Only NGOs can view their campaigns");
}

#[tokio::test]
async fn create_validates_fields() {
    let app = TestApp::new();
    let (_, ngo) = app.register("Trust", "ngo@example.org", "ngo").await;

    let res = app
        .post("/api/campaigns", json!({"title": "T"}), Some(&ngo))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Title, description and goalAmount are required");

    let res = app
        .post(
            "/api/campaigns",
            json!({"title": "T", "description": "D", "goalAmount": -5}),
            Some(&ngo),
        )
        .await;
    assert_eq!(res.message(), "goalAmount must be a positive number");

    let res = app
        .post(
            "/api/campaigns",
            json!({"title": "T", "description": "D", "goalAmount": "250", "endDate": "2001-01-01T00:00:00Z"}),
            Some(&ngo),
        )
        .await;
    assert_eq!(res.message(), "endDate must be a future RFC 3339 timestamp");
}

#[tokio::test]
async fn owner_updates_and_cancels() {
    let app = TestApp::new();
    let (owner, id) = app.ngo_with_campaign("ngo@example.org", 1000.0).await;
    let (_, other) = app.register("Other", "other@example.org", "ngo").await;
    let uri = format!("/api/campaigns/{id}");

    let res = app
        .call(Method::PUT, &uri, Some(json!({"title": "Hijacked"})), Some(&other))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.message(), "You can only modify your own campaigns");

    let res = app
        .call(
            Method::PUT,
            &uri,
            Some(json!({"title": "Deeper wells", "goalAmount": 2000})),
            Some(&owner),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["campaign"]["title"], "Deeper wells");
    assert_eq!(res.body["campaign"]["goalAmount"], 2000.0);
    assert_eq!(res.body["campaign"]["description"], "Dig village wells");

    let res = app.call(Method::DELETE, &uri, None, Some(&other)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.call(Method::DELETE, &uri, None, Some(&owner)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["campaign"]["status"], "cancelled");

    let res = app
        .call(Method::PUT, &uri, Some(json!({"title": "Again"})), Some(&owner))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Cancelled campaigns cannot be modified");
}

#[tokio::test]
async fn unknown_or_malformed_campaign_id() {
    let app = TestApp::new();
    let (cookie, _) = app.ngo_with_campaign("ngo@example.org", 10.0).await;

    let res = app.get("/api/campaigns/not-a-uuid", Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Invalid campaign ID");

    let res = app
        .get(
            "/api/campaigns/00000000-0000-4000-8000-000000000000",
            Some(&cookie),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "Campaign not found");
}

#[tokio::test]
async fn ngo_directory_is_public() {
    let app = TestApp::new();
    let (ngo_id, _) = app.register("Trust", "ngo@example.org", "ngo").await;
    app.register("Ada", "ada@example.org", "donor").await;

    let res = app.get("/api/ngo", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let ngos = res.body["ngos"].as_array().unwrap();
    assert_eq!(ngos.len(), 1);
    assert_eq!(ngos[0]["role"], "ngo");

    let res = app.get(&format!("/api/ngo/{ngo_id}"), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["ngo"]["name"], "Trust");

    let res = app.get(&format!("/api/ngo/{ngo_id}/campaigns"), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["campaigns"].as_array().unwrap().is_empty());

    let res = app.get("/api/ngo/123", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Invalid NGO ID");
}

#[tokio::test]
async fn ngo_updates_own_profile() {
    let app = TestApp::new();
    let (_, ngo) = app.register("Trust", "ngo@example.org", "ngo").await;
    let (_, donor) = app.register("Ada", "ada@example.org", "donor").await;

    let res = app
        .call(Method::PUT, "/api/ngo", Some(json!({"website": "https://trust.org"})), Some(&donor))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .call(Method::PUT, "/api/ngo", Some(json!({"website": "ftp://trust.org"})), Some(&ngo))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Website must be an http(s) URL");

    let res = app
        .call(
            Method::PUT,
            "/api/ngo",
            Some(json!({"name": "Clean Water Trust", "website": "https://trust.org", "category": "water"})),
            Some(&ngo),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["ngo"]["name"], "Clean Water Trust");
    assert_eq!(res.body["ngo"]["website"], "https://trust.org");
    assert_eq!(res.body["ngo"]["category"], "water");
}

#[tokio::test]
async fn banner_upload_is_owner_only() {
    let app = TestApp::new();
    let (ngo_id, ngo) = app.register("Trust", "ngo@example.org", "ngo").await;
    let (_, other) = app.register("Other", "other@example.org", "ngo").await;
    let uri = format!("/api/ngo/banner/{ngo_id}");

    let res = app
        .post(&uri, json!({"image": tiny_png_data_url()}), Some(&other))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.post(&uri, json!({}), Some(&ngo)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Image is required");

    let res = app
        .post(&uri, json!({"image": "data:text/plain;base64,aGk="}), Some(&ngo))
        .await;
    assert_eq!(res.message(), "Unsupported image type");

    let res = app
        .post(&uri, json!({"image": tiny_png_data_url()}), Some(&ngo))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let url = res.body["banner"].as_str().unwrap().to_string();
    assert!(url.starts_with("https://cdn.test/banners/"));
    assert!(url.ends_with(".png"));

    let res = app.get(&format!("/api/ngo/{ngo_id}"), None).await;
    assert_eq!(res.body["ngo"]["banner"], url.as_str());
    assert_eq!(app.images.stored.lock().unwrap().len(), 1);
}
