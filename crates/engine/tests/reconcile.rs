use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use engine::{
    CreateTransactionCmd, Engine, EngineError, GatewayLookup, GatewayStatus, OperatorKind,
    StatusGateway, SyncOutcome, TransactionKind, TransactionStatus,
};
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::json;

struct MockGateway {
    lookups: HashMap<String, GatewayLookup>,
    unavailable: bool,
}

impl MockGateway {
    fn with_status(gateway_ref: &str, status: GatewayStatus) -> Self {
        let mut lookups = HashMap::new();
        lookups.insert(
            gateway_ref.to_string(),
            GatewayLookup::Found {
                status,
                raw: json!({ "status": "mock", "ref": gateway_ref }),
            },
        );
        Self {
            lookups,
            unavailable: false,
        }
    }

    fn empty() -> Self {
        Self {
            lookups: HashMap::new(),
            unavailable: false,
        }
    }

    fn down() -> Self {
        Self {
            lookups: HashMap::new(),
            unavailable: true,
        }
    }
}

#[async_trait]
impl StatusGateway for MockGateway {
    async fn fetch_status(&self, gateway_ref: &str) -> Result<GatewayLookup, EngineError> {
        if self.unavailable {
            return Err(EngineError::GatewayUnavailable(
                "gateway timed out".to_string(),
            ));
        }
        Ok(self
            .lookups
            .get(gateway_ref)
            .cloned()
            .unwrap_or(GatewayLookup::NotFound))
    }
}

async fn engine_with_gateway(gateway: MockGateway) -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .gateway(Arc::new(gateway))
        .build();
    engine.create_user("alice", "Alice", 50_000).await.unwrap();
    engine
        .create_operator("op-airtel", "AIRTEL", OperatorKind::Mobile, 250)
        .await
        .unwrap();
    engine
}

fn recharge(amount_minor: i64, status: TransactionStatus) -> CreateTransactionCmd {
    CreateTransactionCmd::new("alice", TransactionKind::Recharge, status, amount_minor)
        .operator_id("op-airtel")
}

#[tokio::test]
async fn sync_settles_pending_recharge_reported_successful() {
    let engine = engine_with_gateway(MockGateway::with_status("OP1", GatewayStatus::Success)).await;
    let tx = engine
        .create_transaction(recharge(20_000, TransactionStatus::Pending).gateway_ref("OP1"))
        .await
        .unwrap()
        .remove(0);

    let outcome = engine.sync_from_gateway(tx.id).await.unwrap();
    match outcome {
        SyncOutcome::Updated {
            previous,
            new,
            transaction,
        } => {
            assert_eq!(previous, TransactionStatus::Pending);
            assert_eq!(new, TransactionStatus::Success);
            assert_eq!(transaction.id, tx.id);
        }
        other => panic!("expected Updated, got {other:?}"),
    }
    assert_eq!(engine.wallet_balance("alice").await.unwrap().minor(), 30_000);
}

#[tokio::test]
async fn sync_failure_on_settled_recharge_never_auto_refunds() {
    let engine = engine_with_gateway(MockGateway::with_status("OP2", GatewayStatus::Failed)).await;
    let tx = engine
        .create_transaction(recharge(20_000, TransactionStatus::Success).gateway_ref("OP2"))
        .await
        .unwrap()
        .remove(0);
    assert_eq!(engine.wallet_balance("alice").await.unwrap().minor(), 30_000);

    let outcome = engine.sync_from_gateway(tx.id).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Updated { .. }));

    // The status follows the gateway, the money does not.
    assert_eq!(
        engine.transaction(tx.id).await.unwrap().status,
        TransactionStatus::Failed
    );
    assert_eq!(engine.wallet_balance("alice").await.unwrap().minor(), 30_000);
}

#[tokio::test]
async fn sync_not_found_leaves_everything_untouched() {
    let engine = engine_with_gateway(MockGateway::empty()).await;
    let tx = engine
        .create_transaction(recharge(20_000, TransactionStatus::Success).gateway_ref("OP3"))
        .await
        .unwrap()
        .remove(0);

    let outcome = engine.sync_from_gateway(tx.id).await.unwrap();
    assert_eq!(outcome, SyncOutcome::NotFound);
    assert_eq!(
        engine.transaction(tx.id).await.unwrap().status,
        TransactionStatus::Success
    );
    assert_eq!(engine.wallet_balance("alice").await.unwrap().minor(), 30_000);
}

#[tokio::test]
async fn sync_agreeing_statuses_need_no_change() {
    let engine = engine_with_gateway(MockGateway::with_status("OP4", GatewayStatus::Success)).await;
    let tx = engine
        .create_transaction(recharge(20_000, TransactionStatus::Success).gateway_ref("OP4"))
        .await
        .unwrap()
        .remove(0);

    let outcome = engine.sync_from_gateway(tx.id).await.unwrap();
    assert_eq!(outcome, SyncOutcome::NoChangeNeeded);
    assert_eq!(engine.wallet_balance("alice").await.unwrap().minor(), 30_000);
}

#[tokio::test]
async fn gateway_unavailable_propagates_without_mutation() {
    let engine = engine_with_gateway(MockGateway::down()).await;
    let tx = engine
        .create_transaction(recharge(20_000, TransactionStatus::Pending).gateway_ref("OP5"))
        .await
        .unwrap()
        .remove(0);

    let err = engine.sync_from_gateway(tx.id).await.unwrap_err();
    assert!(matches!(err, EngineError::GatewayUnavailable(_)));
    assert_eq!(
        engine.transaction(tx.id).await.unwrap().status,
        TransactionStatus::Pending
    );
    assert_eq!(engine.wallet_balance("alice").await.unwrap().minor(), 50_000);
}

#[tokio::test]
async fn sync_requires_a_gateway_reference() {
    let engine = engine_with_gateway(MockGateway::empty()).await;
    let tx = engine
        .create_transaction(recharge(20_000, TransactionStatus::Pending))
        .await
        .unwrap()
        .remove(0);

    let err = engine.sync_from_gateway(tx.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn sync_rejects_non_recharge_kinds() {
    let engine = engine_with_gateway(MockGateway::empty()).await;
    let tx = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                TransactionKind::AddFund,
                TransactionStatus::Pending,
                1_000,
            )
            .gateway_ref("OP6"),
        )
        .await
        .unwrap()
        .remove(0);

    let err = engine.sync_from_gateway(tx.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn check_status_reports_gateway_view() {
    let engine = engine_with_gateway(MockGateway::with_status("OP7", GatewayStatus::Pending)).await;
    engine
        .create_transaction(recharge(20_000, TransactionStatus::Pending).gateway_ref("OP7"))
        .await
        .unwrap();

    let check = engine.check_status("OP7").await.unwrap();
    assert!(check.success);
    assert_eq!(check.mapped_status, Some(TransactionStatus::Pending));
    assert_eq!(check.api_response.unwrap()["ref"], "OP7");
}

#[tokio::test]
async fn check_status_not_found_is_a_valid_outcome() {
    let engine = engine_with_gateway(MockGateway::empty()).await;
    engine
        .create_transaction(recharge(20_000, TransactionStatus::Pending).gateway_ref("OP8"))
        .await
        .unwrap();

    let check = engine.check_status("OP8").await.unwrap();
    assert!(!check.success);
    assert!(check.api_response.is_none());
    assert!(check.mapped_status.is_none());
}

#[tokio::test]
async fn check_status_requires_a_known_local_transaction() {
    let engine = engine_with_gateway(MockGateway::empty()).await;
    let err = engine.check_status("OP-UNSEEN").await.unwrap_err();
    assert!(matches!(err, EngineError::TransactionNotFound(_)));
}

#[tokio::test]
async fn engine_without_gateway_rejects_reconciliation() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build();
    engine.create_user("alice", "Alice", 0).await.unwrap();
    engine
        .create_operator("op-airtel", "AIRTEL", OperatorKind::Mobile, 250)
        .await
        .unwrap();
    let tx = engine
        .create_transaction(recharge(1_000, TransactionStatus::Pending).gateway_ref("OP9"))
        .await
        .unwrap()
        .remove(0);

    let err = engine.sync_from_gateway(tx.id).await.unwrap_err();
    assert!(matches!(err, EngineError::GatewayUnavailable(_)));
}
