//! # Server Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use scanbook::server::{self, AppState, ServerConfig, USER_HEADER};
use scanbook::store::{KvStore, MemoryStore};
use scanbook::symbol::{BuiltinBackend, SymbolAdapter};

fn config() -> ServerConfig {
    ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        data_dir: None,
    }
}

fn app_with(store: Arc<dyn KvStore>, adapter: SymbolAdapter) -> Router {
    let state = AppState::with_parts(config(), store, Arc::new(adapter)).unwrap();
    server::router(Arc::new(state))
}

fn ready_app() -> Router {
    app_with(
        Arc::new(MemoryStore::new()),
        SymbolAdapter::with_backend(Arc::new(BuiltinBackend)),
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn index_serves_portal() {
    let app = ready_app();
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<title>Scanbook</title>"));
    assert!(!html.contains("__BOOT_TIME__"));
    // Catalog text is user-editable and only ever set as text
    assert!(!html.contains("innerHTML"));
}

#[tokio::test]
async fn login_remembers_username() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let app = app_with(store.clone(), SymbolAdapter::builtin());

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/login",
            None,
            json!({"username": "tester", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/login",
            None,
            json!({"username": "tester", "password": "scan123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"username": "tester"}));

    let (_, body) = send_json(&app, get("/api/login")).await;
    assert_eq!(body, json!({"last_username": "tester"}));
    assert_eq!(store.get_raw("username").unwrap().as_deref(), Some("tester"));

    // Logging out keeps the name for the next sign-in
    let (status, _) = send(&app, Request::post("/api/logout").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = send_json(&app, get("/api/login")).await;
    assert_eq!(body, json!({"last_username": "tester"}));
}

#[tokio::test]
async fn scanbooks_list_and_detail() {
    let app = ready_app();
    let (status, body) = send_json(&app, get("/api/scanbooks")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"basic-sale"));

    let (status, body) = send_json(&app, get("/api/scanbooks/weighted-items")).await;
    assert_eq!(status, StatusCode::OK);
    let ham = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["sku"] == "DELI-HAM")
        .unwrap();
    assert_eq!(ham["effective_symbology"], "gs1_datamatrix");
    assert_eq!(ham["display"], "(01)00012345000010(16)261102(3103)000454");

    let (status, _) = send_json(&app, get("/api/scanbooks/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_mutations_require_user() {
    let app = ready_app();
    let (status, _) = send_json(
        &app,
        json_request(
            "POST",
            "/api/items",
            None,
            json!({"name": "Gum", "sku": "990001"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        json_request(
            "POST",
            "/api/items",
            Some("stranger"),
            json!({"name": "Gum", "sku": "990001"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn custom_item_lifecycle_persists() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let app = app_with(
        store.clone(),
        SymbolAdapter::with_backend(Arc::new(BuiltinBackend)),
    );

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/items",
            Some("tester"),
            json!({"name": "Gum", "sku": "990001"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["custom"], json!(true));

    // Duplicate of a built-in SKU
    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/items",
            Some("tester"),
            json!({"name": "Clash", "sku": "049000000443"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    let (status, _) = send_json(
        &app,
        json_request(
            "PUT",
            "/api/items/990001",
            Some("tester"),
            json!({"name": "Mint Gum", "sku": "990001", "symbology": "code128"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A fresh app over the same store sees the saved item
    let reloaded = app_with(store.clone(), SymbolAdapter::builtin());
    let (_, items) = send_json(&reloaded, get("/api/items")).await;
    let gum = items
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["sku"] == "990001")
        .unwrap();
    assert_eq!(gum["name"], "Mint Gum");
    assert_eq!(gum["effective_symbology"], "code128");

    let (status, _) = send(
        &app,
        Request::delete("/api/items/990001")
            .header(USER_HEADER, "tester")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Request::delete("/api/items/049000000443")
            .header(USER_HEADER, "tester")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn gs1_item_keeps_batch_and_serial_apart() {
    let app = ready_app();
    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/items",
            Some("tester"),
            json!({
                "name": "Sliced Ham",
                "sku": "HAM-2101",
                "symbology": "gs1_qr",
                "gs1": {"gtin": "00049000000443", "batch": "B2101", "serial": "S1"}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["display"], "(01)00049000000443(10)B2101(21)S1");
    assert_eq!(body["payload"], "010004900000044310B2101\u{1d}21S1");

    let (status, png) = send(&app, get("/api/items/HAM-2101/barcode.png")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&png[1..4], b"PNG");
}

#[tokio::test]
async fn import_reports_rejections() {
    let app = ready_app();
    let request = Request::post("/api/items/import")
        .header(USER_HEADER, "lead")
        .body(Body::from(
            json!([
                {"name": "One", "sku": "880001"},
                {"name": "Dup", "sku": "880001"},
                {"name": "Bad", "sku": "has space"}
            ])
            .to_string(),
        ))
        .unwrap();
    let (status, report) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["added"], json!(["880001"]));
    assert_eq!(report["rejected"].as_array().unwrap().len(), 2);

    let (_, exported) = send_json(&app, get("/api/items/export")).await;
    assert_eq!(exported, json!([{"name": "One", "sku": "880001", "unit_of_measure": "each"}]));

    let bad = Request::post("/api/items/import")
        .header(USER_HEADER, "lead")
        .body(Body::from("not json"))
        .unwrap();
    let (status, _) = send_json(&app, bad).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn barcode_png_is_stable() {
    let app = ready_app();
    let (status, first) = send(&app, get("/api/items/049000000443/barcode.png")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&first[1..4], b"PNG");

    // Second request comes from the cache and must match byte for byte
    let (_, second) = send(&app, get("/api/items/049000000443/barcode.png")).await;
    assert_eq!(first, second);

    let (status, _) = send(&app, get("/api/items/NOPE/barcode.png")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn barcode_before_backend_ready_is_placeholder() {
    let app = app_with(Arc::new(MemoryStore::new()), SymbolAdapter::builtin());
    let (status, status_body) = send_json(&app, get("/api/symbols/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(status_body, json!({"state": "unloaded"}));

    let (status, png) = send(&app, get("/api/items/070470000329/barcode.png")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&png[1..4], b"PNG");

    let (_, status_body) = send_json(
        &app,
        Request::post("/api/symbols/load").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status_body, json!({"state": "ready"}));
}

#[tokio::test]
async fn gs1_preview_and_parse() {
    let app = ready_app();
    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/gs1/preview",
            None,
            json!({"gtin": "00049000000443", "sell_by_date": "2025-12-15"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["element"], "010004900000044316251215");
    assert_eq!(body["display"], "(01)00049000000443(16)251215");

    let (_, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/gs1/preview",
            None,
            json!({"gtin": "00049000000444"}),
        ),
    )
    .await;
    assert!(body["strict_error"].as_str().unwrap().contains("check digit"));

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/gs1/parse",
            None,
            json!({"input": "(01)00049000000443(10)L42"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"]["batch"], "L42");

    let (status, _) = send_json(
        &app,
        json_request("POST", "/api/gs1/parse", None, json!({"input": "??"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scanbook_sheet_renders() {
    let app = ready_app();
    let (status, png) = send(&app, get("/api/scanbooks/dated-perishables/sheet.png")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&png[1..4], b"PNG");
}
