//! Transaction primitives.
//!
//! A `Transaction` is the unit the status state machine runs over. Its
//! ledger side effects live in the `ledger_effects` table and are applied
//! only through the transition validator / ledger mutator pair.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Recharge,
    AddFund,
    Transfer,
    Referral,
    Cashback,
    Debit,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recharge => "recharge",
            Self::AddFund => "add_fund",
            Self::Transfer => "transfer",
            Self::Referral => "referral",
            Self::Cashback => "cashback",
            Self::Debit => "debit",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "recharge" => Ok(Self::Recharge),
            "add_fund" => Ok(Self::AddFund),
            "transfer" => Ok(Self::Transfer),
            "referral" => Ok(Self::Referral),
            "cashback" => Ok(Self::Cashback),
            "debit" => Ok(Self::Debit),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
    Refund,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Refund => "refund",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "refund" => Ok(Self::Refund),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    /// External-facing correlation id; the key the payment gateway knows
    /// this transaction by. Unique where present.
    pub gateway_ref: Option<String>,
    pub user_id: String,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub amount: Money,
    pub operator_id: Option<String>,
    /// For transfers: the recipient this fan-out row is linked to.
    pub recipient_id: Option<String>,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: String,
        kind: TransactionKind,
        status: TransactionStatus,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            gateway_ref: None,
            user_id,
            kind,
            status,
            amount,
            operator_id: None,
            recipient_id: None,
            description: None,
            ip_address: None,
            device_info: None,
            created_at,
            updated_at: created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub gateway_ref: Option<String>,
    pub user_id: String,
    pub kind: String,
    pub status: String,
    pub amount_minor: i64,
    pub operator_id: Option<String>,
    pub recipient_id: Option<String>,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
    #[sea_orm(has_many = "super::ledger::Entity")]
    LedgerEffects,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::ledger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEffects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            gateway_ref: ActiveValue::Set(tx.gateway_ref.clone()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.minor()),
            operator_id: ActiveValue::Set(tx.operator_id.clone()),
            recipient_id: ActiveValue::Set(tx.recipient_id.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            ip_address: ActiveValue::Set(tx.ip_address.clone()),
            device_info: ActiveValue::Set(tx.device_info.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::TransactionNotFound(model.id.clone()))?,
            gateway_ref: model.gateway_ref,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            status: TransactionStatus::try_from(model.status.as_str())?,
            amount: Money::new(model.amount_minor),
            operator_id: model.operator_id,
            recipient_id: model.recipient_id,
            description: model.description,
            ip_address: model.ip_address,
            device_info: model.device_info,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
