use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use engine::{
    Engine, EngineError, GatewayLookup, GatewayStatus, StatusGateway,
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use server::{ServerState, router};
use tower::ServiceExt;

struct MockGateway {
    lookups: HashMap<String, GatewayLookup>,
}

#[async_trait]
impl StatusGateway for MockGateway {
    async fn fetch_status(&self, gateway_ref: &str) -> Result<GatewayLookup, EngineError> {
        Ok(self
            .lookups
            .get(gateway_ref)
            .cloned()
            .unwrap_or(GatewayLookup::NotFound))
    }
}

async fn test_router() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let mut lookups = HashMap::new();
    lookups.insert(
        "OP1".to_string(),
        GatewayLookup::Found {
            status: GatewayStatus::Success,
            raw: json!({ "status": "SUCCESS", "ref": "OP1" }),
        },
    );

    let engine = Engine::builder()
        .database(db)
        .gateway(Arc::new(MockGateway { lookups }))
        .build();
    engine.create_user("alice", "Alice", 50_000).await.unwrap();
    engine
        .create_operator("op-airtel", "AIRTEL", engine::OperatorKind::Mobile, 250)
        .await
        .unwrap();

    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn recharge_body(amount_minor: i64, status: &str) -> Value {
    json!({
        "user_id": "alice",
        "kind": "RECHARGE",
        "status": status,
        "amount_minor": amount_minor,
        "operator_id": "op-airtel",
    })
}

#[tokio::test]
async fn recharge_roundtrip_debits_and_refunds_once() {
    let app = test_router().await;

    let (status, created) = send(
        &app,
        "POST",
        "/transactions",
        Some(recharge_body(20_000, "SUCCESS")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tx_id = created["transactions"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(created["transactions"][0]["status"], "SUCCESS");

    let (status, balance) = send(&app, "GET", "/users/alice/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["wallet_balance_minor"], 30_000);

    let patch = json!({ "status": "FAILED", "refund_requested": true });
    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/transactions/{tx_id}"),
        Some(patch.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "FAILED");

    let (_, balance) = send(&app, "GET", "/users/alice/balance", None).await;
    assert_eq!(balance["wallet_balance_minor"], 50_000);

    // Second refund request: distinguishable conflict, balance untouched.
    let (status, error) = send(
        &app,
        "PATCH",
        &format!("/transactions/{tx_id}"),
        Some(patch),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error["error"].as_str().unwrap().contains("Already applied"));

    let (_, balance) = send(&app, "GET", "/users/alice/balance", None).await;
    assert_eq!(balance["wallet_balance_minor"], 50_000);
}

#[tokio::test]
async fn insufficient_funds_is_422_and_atomic() {
    let app = test_router().await;

    let (status, error) = send(
        &app,
        "POST",
        "/transactions",
        Some(recharge_body(60_000, "SUCCESS")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error["error"].as_str().unwrap().contains("Insufficient"));

    let (_, balance) = send(&app, "GET", "/users/alice/balance", None).await;
    assert_eq!(balance["wallet_balance_minor"], 50_000);

    let (_, listed) = send(&app, "GET", "/transactions", None).await;
    assert_eq!(listed["transactions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_linked_entities_are_404() {
    let app = test_router().await;

    let body = json!({
        "user_id": "ghost",
        "kind": "ADD_FUND",
        "status": "SUCCESS",
        "amount_minor": 1000,
    });
    let (status, _) = send(&app, "POST", "/transactions", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/users/ghost/balance", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_reverses_and_removes() {
    let app = test_router().await;

    let (_, created) = send(
        &app,
        "POST",
        "/transactions",
        Some(recharge_body(20_000, "SUCCESS")),
    )
    .await;
    let tx_id = created["transactions"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "DELETE", &format!("/transactions/{tx_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, balance) = send(&app, "GET", "/users/alice/balance", None).await;
    assert_eq!(balance["wallet_balance_minor"], 50_000);
}

#[tokio::test]
async fn gateway_endpoints_report_and_sync() {
    let app = test_router().await;

    let mut body = recharge_body(20_000, "PENDING");
    body["gateway_ref"] = json!("OP1");
    let (_, created) = send(&app, "POST", "/transactions", Some(body)).await;
    let tx_id = created["transactions"][0]["id"].as_str().unwrap().to_string();

    let (status, check) = send(&app, "GET", "/transactions/check-status/OP1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check["success"], true);
    assert_eq!(check["mapped_status"], "SUCCESS");

    let (status, synced) = send(
        &app,
        "POST",
        &format!("/transactions/update-from-api/{tx_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(synced["status_updated"], true);
    assert_eq!(synced["previous_status"], "PENDING");
    assert_eq!(synced["new_status"], "SUCCESS");

    // The settle debited the wallet through the normal path.
    let (_, balance) = send(&app, "GET", "/users/alice/balance", None).await;
    assert_eq!(balance["wallet_balance_minor"], 30_000);

    // A reference the gateway has never seen is a valid, non-error answer.
    let mut body = recharge_body(1_000, "PENDING");
    body["gateway_ref"] = json!("OP-UNSEEN");
    let (_, created) = send(&app, "POST", "/transactions", Some(body)).await;
    let other_id = created["transactions"][0]["id"].as_str().unwrap().to_string();

    let (status, synced) = send(
        &app,
        "POST",
        &format!("/transactions/update-from-api/{other_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(synced["record_found"], false);
    assert_eq!(synced["status_updated"], false);
}

#[tokio::test]
async fn batch_credit_reports_each_item() {
    let app = test_router().await;

    let body = json!({
        "items": [
            { "user_id": "alice", "kind": "CASHBACK", "amount_minor": 500 },
            { "user_id": "ghost", "kind": "CASHBACK", "amount_minor": 500 },
        ]
    });
    let (status, response) = send(&app, "POST", "/transactions/batch-credit", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let results = response["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["ok"], true);
    assert_eq!(results[1]["ok"], false);
    assert!(results[1]["error"].as_str().unwrap().contains("not found"));

    let (_, balance) = send(&app, "GET", "/users/alice/balance", None).await;
    assert_eq!(balance["wallet_balance_minor"], 50_500);
}

#[tokio::test]
async fn list_supports_status_filter() {
    let app = test_router().await;

    send(
        &app,
        "POST",
        "/transactions",
        Some(recharge_body(1_000, "PENDING")),
    )
    .await;
    send(
        &app,
        "POST",
        "/transactions",
        Some(recharge_body(2_000, "SUCCESS")),
    )
    .await;

    let (status, listed) = send(&app, "GET", "/transactions?status=PENDING", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = listed["transactions"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "PENDING");
}
