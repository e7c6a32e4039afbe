//! End-to-end tests against a running server
//!
//! These tests require the API server running on the configured address. The
//! level card test additionally needs a reachable rendering service and image
//! host, and uploads a real image.
//!
//! Run with: cargo test --test e2e_test -- --ignored --nocapture
//!
//! Set API_BASE_URL to override default (http://localhost:3000)

mod fixtures;

use fixtures::*;

/// Get base URL from env or default to localhost
fn get_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[tokio::test]
#[ignore] // Requires running API server
async fn test_e2e_health_check() {
    let base_url = get_base_url();
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("Health check failed");

    assert!(
        response.status().is_success(),
        "Health check returned non-success status: {}",
        response.status()
    );

    println!("✓ Health check passed");
}

#[tokio::test]
#[ignore] // Requires running API server
async fn test_e2e_rank_card() {
    let base_url = get_base_url();
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/v1/card", base_url))
        .json(&rank_card())
        .send()
        .await
        .expect("Card request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.expect("Card body unreadable");
    assert!(body.contains("Level #3"), "unexpected card body: {}", body);

    println!("✓ Rank card rendered ({} bytes)", body.len());
}

#[tokio::test]
#[ignore] // Requires running API server, rendering service and image host
async fn test_e2e_level_card_upload() {
    let base_url = get_base_url();
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/v1/level-card", base_url))
        .json(&level_card())
        .send()
        .await
        .expect("Level card request failed");

    let status = response.status();
    let body: serde_json::Value = response.json().await.expect("Level card body is not JSON");
    assert!(status.is_success(), "Level card failed with {}: {}", status, body);

    let image_url = body["image_url"].as_str().expect("No image_url in response");
    assert!(!image_url.ends_with("/json"));

    println!("✓ Level card hosted at {}", image_url);
}
