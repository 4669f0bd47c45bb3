//! Operators table (read-only reference data).
//!
//! Operators are the mobile/DTH providers a recharge is placed against.
//! They are seeded once and never mutated by the engine.

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorKind {
    Mobile,
    Dth,
}

impl OperatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Dth => "dth",
        }
    }
}

impl TryFrom<&str> for OperatorKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "mobile" => Ok(Self::Mobile),
            "dth" => Ok(Self::Dth),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid operator kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operator {
    pub id: String,
    pub code: String,
    pub kind: OperatorKind,
    /// Commission in basis points of the recharge amount.
    pub commission_bps: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "operators")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub kind: String,
    pub commission_bps: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Operator> for ActiveModel {
    fn from(operator: &Operator) -> Self {
        Self {
            id: ActiveValue::Set(operator.id.clone()),
            code: ActiveValue::Set(operator.code.clone()),
            kind: ActiveValue::Set(operator.kind.as_str().to_string()),
            commission_bps: ActiveValue::Set(operator.commission_bps),
        }
    }
}

impl TryFrom<Model> for Operator {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            code: model.code,
            kind: OperatorKind::try_from(model.kind.as_str())?,
            commission_bps: model.commission_bps,
        })
    }
}
