//! Transition validator.
//!
//! A pure decision table: no I/O, no clock. Given a transaction kind, the
//! current status and the requested status it answers which transitions are
//! legal and what ledger effect each one entails. The ledger mutator
//! executes the returned plan; nothing else in the engine decides whether
//! money moves.

use crate::{EffectDirection, EngineError, ResultEngine, TransactionKind, TransactionStatus};

/// The ledger effect a transition entails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannedEffect {
    /// Status change only; no money moves.
    None,
    /// Apply the settlement effect for the transaction's kind (debit the
    /// wallet for recharge/transfer/debit, credit it for
    /// add_fund/referral/cashback).
    Settle,
    /// Give back the settlement effect, if one was applied. Guarded by the
    /// idempotency record; a second reversal is rejected there.
    Reverse,
}

/// A validated transition: the status to persist and the effect to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionPlan {
    pub status: TransactionStatus,
    pub effect: PlannedEffect,
}

/// Which way the settlement of a transaction moves the owner's wallet.
#[must_use]
pub fn settlement_direction(kind: TransactionKind) -> EffectDirection {
    match kind {
        TransactionKind::Recharge | TransactionKind::Transfer | TransactionKind::Debit => {
            EffectDirection::Debit
        }
        TransactionKind::AddFund | TransactionKind::Referral | TransactionKind::Cashback => {
            EffectDirection::Credit
        }
    }
}

/// Plans the initial status of a freshly created transaction.
///
/// Creation is only legal in `pending` (no effect) or `success` (settle
/// now); a transaction cannot be born failed or refunded.
pub fn plan_create(status: TransactionStatus) -> ResultEngine<TransitionPlan> {
    match status {
        TransactionStatus::Pending => Ok(TransitionPlan {
            status,
            effect: PlannedEffect::None,
        }),
        TransactionStatus::Success => Ok(TransitionPlan {
            status,
            effect: PlannedEffect::Settle,
        }),
        TransactionStatus::Failed | TransactionStatus::Refund => {
            Err(EngineError::IllegalTransition(format!(
                "cannot create a transaction in status {}",
                status.as_str()
            )))
        }
    }
}

/// Plans a status update on an existing transaction.
///
/// The refund intent is explicit: `success -> failed` without
/// `refund_requested` is legal and leaves the money debited. A repeated
/// refund request on an already-failed or already-refunded transaction
/// still routes to [`PlannedEffect::Reverse`], so the idempotency guard can
/// answer `AlreadyApplied` instead of silently crediting twice.
pub fn plan_update(
    current: TransactionStatus,
    requested: TransactionStatus,
    refund_requested: bool,
) -> ResultEngine<TransitionPlan> {
    use TransactionStatus::{Failed, Pending, Refund, Success};

    let effect = match (current, requested) {
        (Pending, Success) => PlannedEffect::Settle,
        (Pending | Success, Failed) if refund_requested => PlannedEffect::Reverse,
        (Pending | Success, Failed) => PlannedEffect::None,
        (Failed, Failed) if refund_requested => PlannedEffect::Reverse,
        (_, Refund) => PlannedEffect::Reverse,
        _ => {
            return Err(EngineError::IllegalTransition(format!(
                "{} -> {} is not a legal transition",
                current.as_str(),
                requested.as_str()
            )));
        }
    };

    Ok(TransitionPlan {
        status: requested,
        effect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransactionStatus::{Failed, Pending, Refund, Success};

    #[test]
    fn settlement_direction_per_kind() {
        assert_eq!(
            settlement_direction(TransactionKind::Recharge),
            EffectDirection::Debit
        );
        assert_eq!(
            settlement_direction(TransactionKind::Transfer),
            EffectDirection::Debit
        );
        assert_eq!(
            settlement_direction(TransactionKind::Debit),
            EffectDirection::Debit
        );
        assert_eq!(
            settlement_direction(TransactionKind::AddFund),
            EffectDirection::Credit
        );
        assert_eq!(
            settlement_direction(TransactionKind::Referral),
            EffectDirection::Credit
        );
        assert_eq!(
            settlement_direction(TransactionKind::Cashback),
            EffectDirection::Credit
        );
    }

    #[test]
    fn create_allows_pending_and_success_only() {
        assert_eq!(plan_create(Pending).unwrap().effect, PlannedEffect::None);
        assert_eq!(plan_create(Success).unwrap().effect, PlannedEffect::Settle);
        assert!(matches!(
            plan_create(Failed),
            Err(EngineError::IllegalTransition(_))
        ));
        assert!(matches!(
            plan_create(Refund),
            Err(EngineError::IllegalTransition(_))
        ));
    }

    #[test]
    fn pending_to_success_settles() {
        let plan = plan_update(Pending, Success, false).unwrap();
        assert_eq!(plan.status, Success);
        assert_eq!(plan.effect, PlannedEffect::Settle);
    }

    #[test]
    fn pending_to_failed_moves_no_money() {
        let plan = plan_update(Pending, Failed, false).unwrap();
        assert_eq!(plan.effect, PlannedEffect::None);
    }

    #[test]
    fn success_to_failed_without_refund_keeps_money_debited() {
        let plan = plan_update(Success, Failed, false).unwrap();
        assert_eq!(plan.status, Failed);
        assert_eq!(plan.effect, PlannedEffect::None);
    }

    #[test]
    fn success_to_failed_with_refund_reverses() {
        let plan = plan_update(Success, Failed, true).unwrap();
        assert_eq!(plan.effect, PlannedEffect::Reverse);
    }

    #[test]
    fn repeat_refund_routes_to_reverse() {
        // failed -> failed with refund intent reaches the guard, which
        // answers AlreadyApplied; without the intent it is plain illegal.
        let plan = plan_update(Failed, Failed, true).unwrap();
        assert_eq!(plan.effect, PlannedEffect::Reverse);
        assert!(matches!(
            plan_update(Failed, Failed, false),
            Err(EngineError::IllegalTransition(_))
        ));
    }

    #[test]
    fn any_status_may_move_to_refund() {
        for current in [Pending, Success, Failed, Refund] {
            let plan = plan_update(current, Refund, false).unwrap();
            assert_eq!(plan.status, Refund);
            assert_eq!(plan.effect, PlannedEffect::Reverse);
        }
    }

    #[test]
    fn rejects_everything_else() {
        let illegal = [
            (Pending, Pending),
            (Success, Pending),
            (Success, Success),
            (Failed, Pending),
            (Failed, Success),
            (Refund, Pending),
            (Refund, Success),
            (Refund, Failed),
        ];
        for (current, requested) in illegal {
            assert!(
                matches!(
                    plan_update(current, requested, false),
                    Err(EngineError::IllegalTransition(_))
                ),
                "{current:?} -> {requested:?} should be illegal"
            );
        }
    }
}
