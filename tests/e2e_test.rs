//! End-to-end test: a real server on a free port, backed by a throwaway
//! SQLite file, driven over HTTP the way the customer and kitchen screens
//! drive it.
//!
//!   cargo test --test e2e_test

use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use reqwest::{Client, StatusCode};
use restaurant_orders::{build_server, AppState, InMemoryCredentials, SqliteStore};
use serde_json::{json, Value};
use uuid::Uuid;

/// Wait until `url` answers at all, retrying every `interval` for up to
/// `timeout` total. Panics if the service never comes up.
async fn wait_for_http(label: &str, url: &str, timeout: Duration, interval: Duration) {
    let client = Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .unwrap();
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if tokio::time::Instant::now() > deadline {
            panic!("{} did not become ready within {:?}", label, timeout);
        }
        // Any HTTP response (even 4xx) means the server is up.
        if client.get(url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(interval).await;
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("No free port")
}

struct TempDb(PathBuf);

impl TempDb {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("restaurant-e2e-{}.db", Uuid::new_v4())))
    }

    fn url(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

/// Starts the service and returns its base URL.
async fn start_service(db: &TempDb) -> String {
    let state = web::Data::new(AppState::new(
        Arc::new(SqliteStore::new(db.url())),
        Arc::new(InMemoryCredentials::with_defaults()),
        Duration::from_secs(5),
        Duration::from_secs(600),
    ));
    let port = free_port();

    let server = build_server(state, "127.0.0.1", port).expect("Failed to bind the service");
    tokio::spawn(server);

    let app_url = format!("http://127.0.0.1:{}", port);
    wait_for_http(
        "restaurant service",
        &format!("{}/menu", app_url),
        Duration::from_secs(10),
        Duration::from_millis(200),
    )
    .await;
    app_url
}

async fn login(http: &Client, app_url: &str, username: &str, password: &str) -> String {
    let resp = http
        .post(format!("{}/session", app_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to POST /session");
    assert_eq!(resp.status(), StatusCode::OK, "login as {} failed", username);

    let body: Value = resp.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Full flow:
///  1. Log in as the kitchen admin.
///  2. Read the seeded menu.
///  3. Place an order for 2 Burgers and 1 Salade.
///  4. Walk it pending → ready → served from the kitchen side.
///  5. Check the board totals and the error paths.
#[tokio::test]
async fn test_order_goes_from_cart_to_served() {
    let db = TempDb::new();
    let app_url = start_service(&db).await;
    let http = Client::new();

    // ── 1. Log in ────────────────────────────────────────────────────────────
    let admin = login(&http, &app_url, "admin", "admin123").await;

    let whoami: Value = http
        .get(format!("{}/session", app_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(whoami["role"], "admin");

    // ── 2. Menu ──────────────────────────────────────────────────────────────
    let menu: Value = http
        .get(format!("{}/menu", app_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let menu = menu.as_array().expect("menu is an array");
    assert_eq!(menu.len(), 5);
    assert_eq!(menu[0]["name"], "Burger");
    assert_eq!(menu[0]["price"], "10.00");

    // ── 3. Place the order ───────────────────────────────────────────────────
    let create_resp = http
        .post(format!("{}/orders", app_url))
        .bearer_auth(&admin)
        .json(&json!({
            "items": [
                { "menuItemId": 1, "quantity": 2 },
                { "menuItemId": 3, "quantity": 1 },
                { "menuItemId": 4, "quantity": 0 }
            ]
        }))
        .send()
        .await
        .expect("Failed to POST /orders");
    assert_eq!(create_resp.status(), StatusCode::CREATED);

    let order: Value = create_resp.json().await.unwrap();
    let order_id = order["id"].as_i64().expect("Response body missing 'id'");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    let listed: Value = http
        .get(format!("{}/orders", app_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|o| o["id"].as_i64() == Some(order_id)));

    // ── 4. Kitchen walks the order through ───────────────────────────────────
    let board: Value = http
        .get(format!("{}/kitchen/board", app_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(board["refreshSecs"], 5);
    let ticket = &board["tickets"][0];
    assert_eq!(ticket["orderId"].as_i64(), Some(order_id));
    assert_eq!(ticket["total"], "28.00");
    assert_eq!(ticket["nextStatus"], "ready");

    let status_url = format!("{}/orders/{}/status", app_url, order_id);
    for next in ["ready", "served"] {
        let resp = http
            .post(&status_url)
            .bearer_auth(&admin)
            .json(&json!({ "status": next }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], next);
    }

    let resp = http
        .post(&status_url)
        .bearer_auth(&admin)
        .json(&json!({ "status": "ready" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let stored: Value = http
        .get(format!("{}/orders/{}", app_url, order_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored["status"], "served");

    // ── 5. Error paths ───────────────────────────────────────────────────────
    let resp = http
        .post(format!("{}/orders", app_url))
        .bearer_auth(&admin)
        .json(&json!({ "items": [{ "menuItemId": 1, "quantity": 0 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = http
        .get(format!("{}/orders/{}", app_url, order_id + 1_000_000))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = http
        .post(format!("{}/session", app_url))
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customers_cannot_open_the_kitchen() {
    let db = TempDb::new();
    let app_url = start_service(&db).await;
    let http = Client::new();

    let user = login(&http, &app_url, "user", "user123").await;

    let resp = http
        .post(format!("{}/orders", app_url))
        .bearer_auth(&user)
        .json(&json!({ "items": [{ "menuItemId": 5, "quantity": 3 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    for path in ["/kitchen/board", "/orders"] {
        let resp = http
            .get(format!("{}{}", app_url, path))
            .bearer_auth(&user)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", path);
    }

    // Logging out invalidates the token.
    let resp = http
        .delete(format!("{}/session", app_url))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = http
        .get(format!("{}/menu", app_url))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_submissions_get_distinct_ids() {
    let db = TempDb::new();
    let app_url = start_service(&db).await;
    let http = Client::new();
    let admin = login(&http, &app_url, "admin", "admin123").await;

    let requests = (0..10).map(|_| {
        http.post(format!("{}/orders", app_url))
            .bearer_auth(&admin)
            .json(&json!({ "items": [{ "menuItemId": 2, "quantity": 1 }] }))
            .send()
    });
    let responses = futures::future::join_all(requests).await;

    let mut ids = Vec::new();
    for resp in responses {
        let resp = resp.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.unwrap();
        ids.push(body["id"].as_i64().unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);

    let listed: Value = http
        .get(format!("{}/orders", app_url))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_openapi_document_lists_endpoints() {
    let db = TempDb::new();
    let app_url = start_service(&db).await;

    let doc: Value = Client::new()
        .get(format!("{}/api-docs/openapi.json", app_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(doc["paths"]["/orders/{id}/status"].is_object());
    assert!(doc["paths"]["/kitchen/board"].is_object());
}
