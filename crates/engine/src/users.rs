//! Users table.
//!
//! A user row carries the wallet balance; the row is the wallet store. The
//! balance column is written only by the ledger mutator, inside the same
//! database transaction as the transaction status write.

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::Money;

/// A user and their wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub wallet_balance: Money,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub wallet_balance: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: ActiveValue::Set(user.id.clone()),
            name: ActiveValue::Set(user.name.clone()),
            wallet_balance: ActiveValue::Set(user.wallet_balance.minor()),
        }
    }
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            wallet_balance: Money::new(model.wallet_balance),
        }
    }
}
