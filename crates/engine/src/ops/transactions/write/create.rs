use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};

use crate::{
    CreateTransactionCmd, EngineError, Money, ResultEngine, Transaction, TransactionKind,
    transactions, transitions,
};

use super::super::super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Creates a transaction, settling it immediately when the requested
    /// status is `success`.
    ///
    /// A transfer with several recipients fans out into one transaction per
    /// recipient, all inside one database transaction: every recipient is
    /// validated before any debit, so a single bad recipient rejects the
    /// whole request and no partial fan-out is ever visible.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<Vec<Transaction>> {
        let amount = Money::new(cmd.amount_minor);
        let plan = transitions::plan_create(cmd.status)?;
        validate_shape(&cmd)?;

        let user_lock = self.user_locks.handle(&cmd.user_id);
        let _user_guard = user_lock.lock().await;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, &cmd.user_id).await?;
            if let Some(operator_id) = cmd.operator_id.as_deref() {
                self.require_operator(&db_tx, operator_id).await?;
            }
            for recipient_id in &cmd.recipient_ids {
                self.require_recipient(&db_tx, recipient_id).await?;
            }
            if let Some(gateway_ref) = cmd.gateway_ref.as_deref() {
                let existing = transactions::Entity::find()
                    .filter(transactions::Column::GatewayRef.eq(gateway_ref))
                    .one(&db_tx)
                    .await?;
                if existing.is_some() {
                    return Err(EngineError::ExistingKey(gateway_ref.to_string()));
                }
            }

            let now = Utc::now();
            let description = normalize_optional_text(cmd.description.as_deref());

            let mut rows: Vec<Transaction> = Vec::new();
            if cmd.kind == TransactionKind::Transfer {
                for recipient_id in &cmd.recipient_ids {
                    let mut tx = Transaction::new(
                        cmd.user_id.clone(),
                        cmd.kind,
                        plan.status,
                        amount,
                        now,
                    )?;
                    tx.recipient_id = Some(recipient_id.clone());
                    tx.description = description.clone();
                    tx.ip_address = cmd.ip_address.clone();
                    tx.device_info = cmd.device_info.clone();
                    rows.push(tx);
                }
            } else {
                let mut tx =
                    Transaction::new(cmd.user_id.clone(), cmd.kind, plan.status, amount, now)?;
                tx.gateway_ref = cmd.gateway_ref.clone();
                tx.operator_id = cmd.operator_id.clone();
                tx.description = description;
                tx.ip_address = cmd.ip_address.clone();
                tx.device_info = cmd.device_info.clone();
                rows.push(tx);
            }

            for tx in &rows {
                transactions::ActiveModel::from(tx).insert(&db_tx).await?;
                self.run_effect(&db_tx, tx, plan.effect, now).await?;
            }

            Ok(rows)
        })
    }
}

fn validate_shape(cmd: &CreateTransactionCmd) -> ResultEngine<()> {
    match cmd.kind {
        TransactionKind::Recharge => {
            if cmd.operator_id.is_none() {
                return Err(EngineError::InvalidAmount(
                    "operator_id is required for a recharge".to_string(),
                ));
            }
            if !cmd.recipient_ids.is_empty() {
                return Err(EngineError::InvalidAmount(
                    "recipients are only valid for transfers".to_string(),
                ));
            }
        }
        TransactionKind::Transfer => {
            if cmd.recipient_ids.is_empty() {
                return Err(EngineError::InvalidAmount(
                    "at least one recipient is required for a transfer".to_string(),
                ));
            }
            let mut seen = cmd.recipient_ids.clone();
            seen.sort();
            seen.dedup();
            if seen.len() != cmd.recipient_ids.len() {
                return Err(EngineError::InvalidAmount(
                    "duplicate recipient in transfer".to_string(),
                ));
            }
            if cmd.recipient_ids.iter().any(|r| r == &cmd.user_id) {
                return Err(EngineError::InvalidAmount(
                    "cannot transfer to yourself".to_string(),
                ));
            }
            if cmd.operator_id.is_some() {
                return Err(EngineError::InvalidAmount(
                    "operator_id is only valid for recharges".to_string(),
                ));
            }
            if cmd.gateway_ref.is_some() {
                return Err(EngineError::InvalidAmount(
                    "gateway_ref is not supported for transfers".to_string(),
                ));
            }
        }
        TransactionKind::AddFund
        | TransactionKind::Referral
        | TransactionKind::Cashback
        | TransactionKind::Debit => {
            if cmd.operator_id.is_some() {
                return Err(EngineError::InvalidAmount(
                    "operator_id is only valid for recharges".to_string(),
                ));
            }
            if !cmd.recipient_ids.is_empty() {
                return Err(EngineError::InvalidAmount(
                    "recipients are only valid for transfers".to_string(),
                ));
            }
        }
    }
    Ok(())
}
