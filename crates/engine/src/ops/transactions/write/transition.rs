use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, TransactionTrait};
use uuid::Uuid;

use crate::{
    ApplyTransitionCmd, EngineError, ResultEngine, Transaction, TransactionStatus, transactions,
    transitions,
};

use super::super::super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Drives a transaction along one edge of the status machine, applying
    /// the edge's ledger effect atomically with the status write.
    pub async fn apply_transition(&self, cmd: ApplyTransitionCmd) -> ResultEngine<Transaction> {
        let probe = self.probe_transaction(cmd.transaction_id).await?;
        let (_user_guard, _tx_guard) = self
            .lock_for_mutation(&probe.user_id, cmd.transaction_id)
            .await;

        self.apply_transition_locked(
            cmd.transaction_id,
            cmd.status,
            cmd.refund_requested,
            cmd.description.as_deref(),
        )
        .await
    }

    /// The transition body; the caller must already hold the user and
    /// transaction locks (see `lock_for_mutation`). The row is re-read
    /// under the locks so the plan is computed against fresh state.
    pub(in crate::ops) async fn apply_transition_locked(
        &self,
        transaction_id: Uuid,
        requested: TransactionStatus,
        refund_requested: bool,
        description: Option<&str>,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::TransactionNotFound(transaction_id.to_string()))?;
            let tx = Transaction::try_from(model)?;

            let plan = transitions::plan_update(tx.status, requested, refund_requested)?;
            let now = Utc::now();
            self.run_effect(&db_tx, &tx, plan.effect, now).await?;

            let mut active = transactions::ActiveModel {
                id: ActiveValue::Set(transaction_id.to_string()),
                status: ActiveValue::Set(plan.status.as_str().to_string()),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            if let Some(description) = normalize_optional_text(description) {
                active.description = ActiveValue::Set(Some(description));
            }
            let updated = active.update(&db_tx).await?;

            tracing::info!(
                transaction_id = %transaction_id,
                from = tx.status.as_str(),
                to = plan.status.as_str(),
                refund_requested,
                "transaction transitioned"
            );
            Ok(Transaction::try_from(updated)?)
        })
    }
}
