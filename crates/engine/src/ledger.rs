//! Ledger effects table: the idempotency guard's durable record.
//!
//! Every committed balance change writes exactly one row here, keyed by
//! `(transaction_id, direction)` with a unique index. A second application
//! of the same direction for the same transaction is therefore impossible
//! to commit, and the guard can answer "already applied" race-free because
//! the row is written in the same database transaction as the balance
//! delta and the status write.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Direction of a wallet movement, from the wallet owner's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectDirection {
    Debit,
    Credit,
}

impl EffectDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// The direction that reverses this one.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

impl std::fmt::Display for EffectDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EffectDirection {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid effect direction: {other}"
            ))),
        }
    }
}

/// A committed wallet movement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEffect {
    /// Monotonic application sequence (database autoincrement).
    pub seq: i64,
    pub transaction_id: Uuid,
    pub direction: EffectDirection,
    pub user_id: String,
    pub amount: Money,
    pub applied_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_effects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    pub transaction_id: String,
    pub direction: String,
    pub user_id: String,
    pub amount_minor: i64,
    pub applied_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Builds the active model for a fresh effect (sequence assigned by the
    /// database).
    pub(crate) fn insertable(
        transaction_id: Uuid,
        direction: EffectDirection,
        user_id: &str,
        amount: Money,
        applied_at: DateTime<Utc>,
    ) -> ActiveModel {
        ActiveModel {
            seq: ActiveValue::NotSet,
            transaction_id: ActiveValue::Set(transaction_id.to_string()),
            direction: ActiveValue::Set(direction.as_str().to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
            amount_minor: ActiveValue::Set(amount.minor()),
            applied_at: ActiveValue::Set(applied_at),
        }
    }
}

impl TryFrom<Model> for LedgerEffect {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            seq: model.seq,
            transaction_id: Uuid::parse_str(&model.transaction_id)
                .map_err(|_| EngineError::TransactionNotFound(model.transaction_id.clone()))?,
            direction: EffectDirection::try_from(model.direction.as_str())?,
            user_id: model.user_id,
            amount: Money::new(model.amount_minor),
            applied_at: model.applied_at,
        })
    }
}
