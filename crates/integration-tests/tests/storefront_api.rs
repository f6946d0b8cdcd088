//! HTTP flows against a running storefront.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (cargo run -p vitrine-cli -- migrate)
//! - The storefront running (cargo run -p vitrine-storefront)
//!
//! Run with: cargo test -p vitrine-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use vitrine_integration_tests::{storefront_base_url, unique_email};

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a fresh account; the client keeps the session cookie.
async fn registered_client() -> Client {
    let client = client();
    let resp = client
        .post(format!("{}/api/auth/register", storefront_base_url()))
        .json(&json!({ "email": unique_email(), "password": "correct horse battery" }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);
    client
}

async fn create_vitrine(client: &Client) -> Value {
    let resp = client
        .post(format!("{}/api/vitrines", storefront_base_url()))
        .send()
        .await
        .expect("Failed to create vitrine");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_editor_flow_publishes_a_page() {
    let base_url = storefront_base_url();
    let client = registered_client().await;
    let created = create_vitrine(&client).await;
    let id = created["vitrine"]["id"].as_str().unwrap().to_string();
    let slug = format!("api-{}", id.get(..8).unwrap());

    let resp = client
        .get(format!("{base_url}/api/editor/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/api/editor/{id}/slug-check"))
        .json(&json!({ "slug": slug }))
        .send()
        .await
        .unwrap();
    let check: Value = resp.json().await.unwrap();
    assert_eq!(check["status"], "available");

    let resp = client
        .patch(format!("{base_url}/api/editor/{id}"))
        .json(&json!({ "title": "Loja via API", "slug": slug }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/api/editor/{id}/theme"))
        .json(&json!({ "theme": "vibrant" }))
        .send()
        .await
        .unwrap();
    let view: Value = resp.json().await.unwrap();
    assert_eq!(view["active_theme"], "vibrant");

    let resp = client
        .post(format!("{base_url}/api/editor/{id}/products"))
        .json(&json!({ "name": "Caneca", "price": "35.00", "external_link": "https://pay.example.com/c" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Not public until published.
    let resp = client.get(format!("{base_url}/v/{slug}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .post(format!("{base_url}/api/editor/{id}/publish"))
        .send()
        .await
        .unwrap();
    let view: Value = resp.json().await.unwrap();
    assert_eq!(view["vitrine"]["is_published"], true);

    let resp = client.get(format!("{base_url}/v/{slug}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();
    assert!(page.contains("Loja via API"));
    assert!(page.contains("Caneca"));
    assert!(page.contains("R$ 35.00"));

    let resp = client
        .get(format!("{base_url}/api/vitrines"))
        .send()
        .await
        .unwrap();
    let dashboard: Value = resp.json().await.unwrap();
    assert_eq!(dashboard["summary"]["published"], 1);
    assert_eq!(dashboard["summary"]["total_views"], 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_invalid_input_is_rejected() {
    let base_url = storefront_base_url();
    let client = registered_client().await;
    let created = create_vitrine(&client).await;
    let id = created["vitrine"]["id"].as_str().unwrap().to_string();

    client
        .get(format!("{base_url}/api/editor/{id}"))
        .send()
        .await
        .unwrap();

    let resp = client
        .patch(format!("{base_url}/api/editor/{id}"))
        .json(&json!({ "primary_color": "red" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = client
        .post(format!("{base_url}/api/editor/{id}/products"))
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_logout_closes_editor_sessions() {
    let base_url = storefront_base_url();
    let client = registered_client().await;
    let created = create_vitrine(&client).await;
    let id = created["vitrine"]["id"].as_str().unwrap().to_string();

    client
        .get(format!("{base_url}/api/editor/{id}"))
        .send()
        .await
        .unwrap();
    let resp = client
        .post(format!("{base_url}/api/auth/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .post(format!("{base_url}/api/editor/{id}/publish"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
