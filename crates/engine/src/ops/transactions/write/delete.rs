use chrono::Utc;
use sea_orm::{EntityTrait, ModelTrait, TransactionTrait};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, transactions, transitions::settlement_direction,
};

use super::super::super::{Engine, with_tx};

impl Engine {
    /// Administrative delete.
    ///
    /// Never a bare row removal: a settled transaction first gives its
    /// ledger effect back through the same atomic path, and a transaction
    /// that was already refunded is ambiguous to delete and is rejected.
    pub async fn delete_transaction(&self, transaction_id: Uuid) -> ResultEngine<()> {
        let probe = self.probe_transaction(transaction_id).await?;
        let (_user_guard, _tx_guard) = self
            .lock_for_mutation(&probe.user_id, transaction_id)
            .await;

        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::TransactionNotFound(transaction_id.to_string()))?;
            let tx = Transaction::try_from(model.clone())?;

            let settle = settlement_direction(tx.kind);
            let settled = self.effect_applied(&db_tx, tx.id, settle).await?;
            let reversed = self
                .effect_applied(&db_tx, tx.id, settle.opposite())
                .await?;

            if reversed {
                return Err(EngineError::IllegalTransition(format!(
                    "transaction {transaction_id} was already refunded; delete is ambiguous"
                )));
            }
            if settled {
                self.apply_ledger_effect(
                    &db_tx,
                    tx.id,
                    &tx.user_id,
                    settle.opposite(),
                    tx.amount,
                    Utc::now(),
                )
                .await?;
            }

            // Guard rows cascade with the transaction row.
            model.delete(&db_tx).await?;

            tracing::info!(
                transaction_id = %transaction_id,
                reversed_effect = settled,
                "transaction deleted"
            );
            Ok(())
        })
    }
}
