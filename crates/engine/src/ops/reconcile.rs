//! Gateway reconciler.
//!
//! Pulls the gateway's authoritative status for a recharge and, when it
//! differs from the local one, drives the same validator/mutator path a
//! manual status update would take. A gateway-reported failure therefore
//! never auto-refunds: the sync runs with `refund_requested = false`, and
//! an operator has to state the refund intent separately.

use serde_json::Value;
use uuid::Uuid;

use crate::{
    EngineError, GatewayLookup, ResultEngine, StatusGateway, Transaction, TransactionKind,
    TransactionStatus, transactions,
};
use sea_orm::EntityTrait;

use super::Engine;

/// Read-only gateway probe result.
#[derive(Clone, Debug, PartialEq)]
pub struct GatewayCheck {
    /// Whether the gateway knows the reference at all.
    pub success: bool,
    pub api_response: Option<Value>,
    pub mapped_status: Option<TransactionStatus>,
}

/// Outcome of reconciling one transaction against the gateway.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncOutcome {
    Updated {
        previous: TransactionStatus,
        new: TransactionStatus,
        transaction: Transaction,
    },
    /// Gateway and local state already agree.
    NoChangeNeeded,
    /// The gateway has no record of this reference. A valid terminal
    /// answer (test data, timing), never an error, never a mutation.
    NotFound,
}

impl Engine {
    fn gateway(&self) -> ResultEngine<&dyn StatusGateway> {
        self.gateway.as_deref().ok_or_else(|| {
            EngineError::GatewayUnavailable("no gateway client configured".to_string())
        })
    }

    /// Read-only gateway query for a recharge's external reference.
    ///
    /// Never touches local state; "record not found" comes back as a
    /// non-error [`GatewayCheck`] with `success = false`.
    pub async fn check_status(&self, gateway_ref: &str) -> ResultEngine<GatewayCheck> {
        let tx = self.transaction_by_gateway_ref(gateway_ref).await?;
        require_recharge(&tx)?;

        match self.gateway()?.fetch_status(gateway_ref).await? {
            GatewayLookup::Found { status, raw } => Ok(GatewayCheck {
                success: true,
                api_response: Some(raw),
                mapped_status: Some(status.as_local()),
            }),
            GatewayLookup::NotFound => Ok(GatewayCheck {
                success: false,
                api_response: None,
                mapped_status: None,
            }),
        }
    }

    /// Reconciles local status to the gateway's.
    ///
    /// The gateway call runs under the user and transaction locks so the
    /// compare-then-transition is race-free; the call is bounded by the
    /// gateway client timeout, after which `GatewayUnavailable` propagates
    /// and the locks unwind with nothing changed.
    pub async fn sync_from_gateway(&self, transaction_id: Uuid) -> ResultEngine<SyncOutcome> {
        let probe = Transaction::try_from(self.probe_transaction(transaction_id).await?)?;
        require_recharge(&probe)?;
        let gateway_ref = probe
            .gateway_ref
            .clone()
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| {
                EngineError::InvalidAmount(
                    "transaction has no gateway reference to reconcile".to_string(),
                )
            })?;

        let (_user_guard, _tx_guard) = self
            .lock_for_mutation(&probe.user_id, transaction_id)
            .await;

        let lookup = self.gateway()?.fetch_status(&gateway_ref).await?;
        let mapped = match lookup {
            GatewayLookup::NotFound => return Ok(SyncOutcome::NotFound),
            GatewayLookup::Found { status, .. } => status.as_local(),
        };

        // Re-read under the locks; the probe may be stale by now.
        let current = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::TransactionNotFound(transaction_id.to_string()))?;
        let current = Transaction::try_from(current)?;

        if current.status == mapped {
            return Ok(SyncOutcome::NoChangeNeeded);
        }

        let previous = current.status;
        let updated = self
            .apply_transition_locked(transaction_id, mapped, false, None)
            .await?;

        tracing::info!(
            transaction_id = %transaction_id,
            gateway_ref = %gateway_ref,
            from = previous.as_str(),
            to = updated.status.as_str(),
            "status reconciled from gateway"
        );
        Ok(SyncOutcome::Updated {
            previous,
            new: updated.status,
            transaction: updated,
        })
    }
}

fn require_recharge(tx: &Transaction) -> ResultEngine<()> {
    if tx.kind != TransactionKind::Recharge {
        return Err(EngineError::InvalidAmount(format!(
            "gateway reconciliation only applies to recharges, got {}",
            tx.kind.as_str()
        )));
    }
    Ok(())
}
