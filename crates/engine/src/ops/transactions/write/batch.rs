use crate::{
    BatchCreditItem, CreateTransactionCmd, EffectDirection, EngineError, ResultEngine, Transaction,
    TransactionStatus, transitions::settlement_direction,
};

use super::super::super::Engine;

/// Result of one item of a bulk credit run.
#[derive(Debug)]
pub struct BatchCreditOutcome {
    pub user_id: String,
    pub result: Result<Transaction, EngineError>,
}

impl Engine {
    /// Credits many users (cashback / referral payouts).
    ///
    /// Each item is its own per-user atomic operation; there is no batch
    /// lock and no batch-wide rollback. Items that fail report their error
    /// in place, and items that succeeded stay committed.
    pub async fn batch_credit(&self, items: Vec<BatchCreditItem>) -> Vec<BatchCreditOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let user_id = item.user_id.clone();
            let result = self.credit_one(item).await;
            if let Err(err) = &result {
                tracing::warn!(user_id = %user_id, error = %err, "batch credit item failed");
            }
            outcomes.push(BatchCreditOutcome { user_id, result });
        }
        outcomes
    }

    async fn credit_one(&self, item: BatchCreditItem) -> ResultEngine<Transaction> {
        if settlement_direction(item.kind) != EffectDirection::Credit {
            return Err(EngineError::InvalidAmount(format!(
                "batch credit only accepts credit kinds, got {}",
                item.kind.as_str()
            )));
        }

        let mut cmd = CreateTransactionCmd::new(
            item.user_id,
            item.kind,
            TransactionStatus::Success,
            item.amount_minor,
        );
        cmd.description = item.description;

        let mut created = self.create_transaction(cmd).await?;
        created
            .pop()
            .ok_or_else(|| EngineError::InvalidAmount("create returned no transaction".to_string()))
    }
}
