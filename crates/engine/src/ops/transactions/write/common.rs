//! The ledger mutator.
//!
//! Everything that moves money funnels through [`Engine::apply_ledger_effect`]:
//! one guard lookup, one balance floor check, one balance write and one
//! effect row, all on the caller's open database transaction. The status
//! write shares that transaction, so the guard record, the delta and the
//! status can only commit together.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter,
};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::{
    EffectDirection, EngineError, Money, PlannedEffect, ResultEngine, Transaction, ledger,
    transactions, transitions::settlement_direction, users,
};

use super::super::super::Engine;

impl Engine {
    /// Applies one wallet movement plus its guard record.
    ///
    /// Fails with `AlreadyApplied` if `(transaction_id, direction)` was
    /// already recorded, and with `InsufficientFunds` if a debit would take
    /// the balance below zero. Either failure rolls the whole database
    /// transaction back.
    pub(in crate::ops) async fn apply_ledger_effect(
        &self,
        db_tx: &DatabaseTransaction,
        transaction_id: Uuid,
        user_id: &str,
        direction: EffectDirection,
        amount: Money,
        applied_at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        if self.effect_applied(db_tx, transaction_id, direction).await? {
            return Err(EngineError::AlreadyApplied(format!(
                "{direction} already applied for transaction {transaction_id}"
            )));
        }

        let user_model = self.require_user(db_tx, user_id).await?;
        let balance = Money::new(user_model.wallet_balance);
        let delta = match direction {
            EffectDirection::Debit => -amount,
            EffectDirection::Credit => amount,
        };
        let new_balance = balance
            .checked_add(delta)
            .ok_or_else(|| EngineError::InvalidAmount("balance overflow".to_string()))?;
        if new_balance.is_negative() {
            return Err(EngineError::InsufficientFunds(format!(
                "balance {balance} cannot cover {amount}"
            )));
        }

        let user_active = users::ActiveModel {
            id: ActiveValue::Set(user_id.to_string()),
            wallet_balance: ActiveValue::Set(new_balance.minor()),
            ..Default::default()
        };
        user_active.update(db_tx).await?;

        ledger::Model::insertable(transaction_id, direction, user_id, amount, applied_at)
            .insert(db_tx)
            .await?;

        tracing::debug!(
            transaction_id = %transaction_id,
            user_id,
            %direction,
            amount = %amount,
            new_balance = %new_balance,
            "ledger effect applied"
        );
        Ok(())
    }

    /// Whether the guard has a record for `(transaction_id, direction)`.
    pub(in crate::ops) async fn effect_applied(
        &self,
        db_tx: &DatabaseTransaction,
        transaction_id: Uuid,
        direction: EffectDirection,
    ) -> ResultEngine<bool> {
        ledger::Entity::find()
            .filter(ledger::Column::TransactionId.eq(transaction_id.to_string()))
            .filter(ledger::Column::Direction.eq(direction.as_str()))
            .one(db_tx)
            .await
            .map(|model| model.is_some())
            .map_err(Into::into)
    }

    /// Executes a transition plan's effect for a loaded transaction.
    ///
    /// A `Reverse` on a transaction whose settlement was never applied is a
    /// status-only change: there is nothing to give back.
    pub(in crate::ops) async fn run_effect(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
        effect: PlannedEffect,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        match effect {
            PlannedEffect::None => Ok(()),
            PlannedEffect::Settle => {
                self.apply_ledger_effect(
                    db_tx,
                    tx.id,
                    &tx.user_id,
                    settlement_direction(tx.kind),
                    tx.amount,
                    now,
                )
                .await
            }
            PlannedEffect::Reverse => {
                let settle = settlement_direction(tx.kind);
                if !self.effect_applied(db_tx, tx.id, settle).await? {
                    return Ok(());
                }
                self.apply_ledger_effect(
                    db_tx,
                    tx.id,
                    &tx.user_id,
                    settle.opposite(),
                    tx.amount,
                    now,
                )
                .await
            }
        }
    }

    /// Loads a transaction row outside any lock, to learn which user the
    /// mutation must serialize on.
    pub(in crate::ops) async fn probe_transaction(
        &self,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::TransactionNotFound(transaction_id.to_string()))
    }

    /// Takes the user lock, then the transaction lock. Always this order;
    /// the two registries stay deadlock-free only while every caller
    /// acquires them the same way.
    pub(in crate::ops) async fn lock_for_mutation(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        let user_guard = self.user_locks.handle(user_id).lock_owned().await;
        let tx_guard = self
            .transaction_locks
            .handle(&transaction_id.to_string())
            .lock_owned()
            .await;
        (user_guard, tx_guard)
    }
}
