use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{StatusGateway, locks::LockMap};

mod operators;
mod reconcile;
mod transactions;
mod users;

pub use reconcile::{GatewayCheck, SyncOutcome};
pub use transactions::{BatchCreditOutcome, TransactionListFilter};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

pub struct Engine {
    database: DatabaseConnection,
    gateway: Option<Arc<dyn StatusGateway>>,
    user_locks: LockMap,
    transaction_locks: LockMap,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    gateway: Option<Arc<dyn StatusGateway>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the gateway client used by the reconciler. Engines without one
    /// reject reconciliation calls with `GatewayUnavailable`.
    pub fn gateway(mut self, gateway: Arc<dyn StatusGateway>) -> EngineBuilder {
        self.gateway = Some(gateway);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            gateway: self.gateway,
            user_locks: LockMap::default(),
            transaction_locks: LockMap::default(),
        }
    }
}
