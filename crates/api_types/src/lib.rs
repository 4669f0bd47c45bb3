use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod transaction {
    use super::*;

    /// Transaction kinds, in the dashboard client's wire vocabulary.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TransactionKind {
        Recharge,
        AddFund,
        Transfer,
        Referral,
        Cashback,
        Debit,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TransactionStatus {
        Pending,
        Success,
        Failed,
        Refund,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub user_id: String,
        pub kind: TransactionKind,
        pub status: TransactionStatus,
        pub amount_minor: i64,
        /// Required iff kind = RECHARGE.
        pub operator_id: Option<String>,
        /// Required (non-empty) iff kind = TRANSFER; one transaction is
        /// created per recipient.
        pub recipient_ids: Option<Vec<String>>,
        /// External gateway correlation id; unique where present.
        pub gateway_ref: Option<String>,
        pub description: Option<String>,
        pub ip_address: Option<String>,
        pub device_info: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub gateway_ref: Option<String>,
        pub user_id: String,
        pub kind: TransactionKind,
        pub status: TransactionStatus,
        pub amount_minor: i64,
        pub operator_id: Option<String>,
        pub recipient_id: Option<String>,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub status: TransactionStatus,
        pub description: Option<String>,
        /// Refund intent is explicit; it is never inferred from the
        /// transition alone.
        pub refund_requested: Option<bool>,
    }

    /// Query string for `GET /transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub user_id: Option<String>,
        pub kind: Option<TransactionKind>,
        pub status: Option<TransactionStatus>,
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CheckStatusResponse {
        /// Whether the gateway knows the reference.
        pub success: bool,
        /// Raw gateway payload, passed through for display.
        pub api_response: Option<serde_json::Value>,
        pub mapped_status: Option<TransactionStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SyncResponse {
        pub success: bool,
        pub status_updated: bool,
        /// False when the gateway has no record of the reference.
        pub record_found: bool,
        pub previous_status: Option<TransactionStatus>,
        pub new_status: Option<TransactionStatus>,
        pub transaction: Option<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchCreditNew {
        pub items: Vec<BatchCreditItemNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchCreditItemNew {
        pub user_id: String,
        /// Must be a credit kind (ADD_FUND, REFERRAL or CASHBACK).
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchCreditResponse {
        pub results: Vec<BatchCreditResult>,
    }

    /// Per-item outcome; failed items leave earlier successes committed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchCreditResult {
        pub user_id: String,
        pub ok: bool,
        pub transaction: Option<TransactionView>,
        pub error: Option<String>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub id: String,
        pub name: String,
        pub opening_balance_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub name: String,
        pub wallet_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceResponse {
        pub user_id: String,
        pub wallet_balance_minor: i64,
    }
}

pub mod operator {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum OperatorKind {
        Mobile,
        Dth,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperatorNew {
        pub id: String,
        pub code: String,
        pub kind: OperatorKind,
        pub commission_bps: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperatorView {
        pub id: String,
        pub code: String,
        pub kind: OperatorKind,
        pub commission_bps: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperatorsResponse {
        pub operators: Vec<OperatorView>,
    }
}
