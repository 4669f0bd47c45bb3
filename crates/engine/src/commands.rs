//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create / transition /
//! batch credit), keeping call sites readable and avoiding long argument
//! lists.

use uuid::Uuid;

use crate::{TransactionKind, TransactionStatus};

/// Create one transaction (or, for transfers, one per recipient).
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub user_id: String,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub amount_minor: i64,
    pub operator_id: Option<String>,
    pub recipient_ids: Vec<String>,
    pub gateway_ref: Option<String>,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        status: TransactionStatus,
        amount_minor: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            status,
            amount_minor,
            operator_id: None,
            recipient_ids: Vec::new(),
            gateway_ref: None,
            description: None,
            ip_address: None,
            device_info: None,
        }
    }

    #[must_use]
    pub fn operator_id(mut self, operator_id: impl Into<String>) -> Self {
        self.operator_id = Some(operator_id.into());
        self
    }

    #[must_use]
    pub fn recipients<I, S>(mut self, recipient_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipient_ids = recipient_ids.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn gateway_ref(mut self, gateway_ref: impl Into<String>) -> Self {
        self.gateway_ref = Some(gateway_ref.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    #[must_use]
    pub fn device_info(mut self, device_info: impl Into<String>) -> Self {
        self.device_info = Some(device_info.into());
        self
    }
}

/// Drive an existing transaction along one edge of the status machine.
#[derive(Clone, Debug)]
pub struct ApplyTransitionCmd {
    pub transaction_id: Uuid,
    pub status: TransactionStatus,
    /// Refund intent is never inferred from the transition alone; the
    /// caller has to state it.
    pub refund_requested: bool,
    pub description: Option<String>,
}

impl ApplyTransitionCmd {
    #[must_use]
    pub fn new(transaction_id: Uuid, status: TransactionStatus) -> Self {
        Self {
            transaction_id,
            status,
            refund_requested: false,
            description: None,
        }
    }

    #[must_use]
    pub fn refund_requested(mut self, refund_requested: bool) -> Self {
        self.refund_requested = refund_requested;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One credit of a bulk run (cashback / referral payouts).
#[derive(Clone, Debug)]
pub struct BatchCreditItem {
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: Option<String>,
}

impl BatchCreditItem {
    #[must_use]
    pub fn new(user_id: impl Into<String>, kind: TransactionKind, amount_minor: i64) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            amount_minor,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
