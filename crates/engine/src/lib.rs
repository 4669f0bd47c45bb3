//! Transaction ledger and reconciliation engine.
//!
//! The engine is the single owner of wallet balances. Every balance change
//! goes through the transition validator, the idempotency
//! guard (the `ledger_effects` table) and one database transaction, so money
//! is never credited or debited twice and a crash can never leave a balance
//! moved without the transaction status reflecting it.

pub use commands::{ApplyTransitionCmd, BatchCreditItem, CreateTransactionCmd};
pub use error::EngineError;
pub use gateway::{
    DEFAULT_GATEWAY_TIMEOUT, GatewayLookup, GatewayStatus, HttpStatusGateway, StatusGateway,
};
pub use ledger::{EffectDirection, LedgerEffect};
pub use money::Money;
pub use operators::{Operator, OperatorKind};
pub use ops::{
    BatchCreditOutcome, Engine, EngineBuilder, GatewayCheck, SyncOutcome, TransactionListFilter,
};
pub use transactions::{Transaction, TransactionKind, TransactionStatus};
pub use transitions::{PlannedEffect, TransitionPlan, plan_create, plan_update, settlement_direction};
pub use users::User;

mod commands;
mod error;
mod gateway;
mod ledger;
mod locks;
mod money;
mod operators;
mod ops;
mod transactions;
mod transitions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
