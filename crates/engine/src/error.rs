//! The module contains the errors the engine can throw.
//!
//! Validation errors ([`UserNotFound`], [`OperatorNotFound`],
//! [`RecipientNotFound`], [`InvalidAmount`]) are rejected before any
//! mutation. State errors ([`IllegalTransition`], [`AlreadyApplied`]) and
//! the resource error [`InsufficientFunds`] roll the database transaction
//! back, leaving wallet and transaction stores untouched. External errors
//! ([`GatewayUnavailable`]) never mutate local state.
//!
//! [`UserNotFound`]: EngineError::UserNotFound
//! [`OperatorNotFound`]: EngineError::OperatorNotFound
//! [`RecipientNotFound`]: EngineError::RecipientNotFound
//! [`InvalidAmount`]: EngineError::InvalidAmount
//! [`IllegalTransition`]: EngineError::IllegalTransition
//! [`AlreadyApplied`]: EngineError::AlreadyApplied
//! [`InsufficientFunds`]: EngineError::InsufficientFunds
//! [`GatewayUnavailable`]: EngineError::GatewayUnavailable
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Illegal transition: {0}")]
    IllegalTransition(String),
    #[error("Already applied: {0}")]
    AlreadyApplied(String),
    #[error("User \"{0}\" not found!")]
    UserNotFound(String),
    #[error("Operator \"{0}\" not found!")]
    OperatorNotFound(String),
    #[error("Recipient \"{0}\" not found!")]
    RecipientNotFound(String),
    #[error("Transaction \"{0}\" not found!")]
    TransactionNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::IllegalTransition(a), Self::IllegalTransition(b)) => a == b,
            (Self::AlreadyApplied(a), Self::AlreadyApplied(b)) => a == b,
            (Self::UserNotFound(a), Self::UserNotFound(b)) => a == b,
            (Self::OperatorNotFound(a), Self::OperatorNotFound(b)) => a == b,
            (Self::RecipientNotFound(a), Self::RecipientNotFound(b)) => a == b,
            (Self::TransactionNotFound(a), Self::TransactionNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::GatewayUnavailable(a), Self::GatewayUnavailable(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
