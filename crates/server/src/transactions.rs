//! Transactions API endpoints

use api_types::transaction::{
    BatchCreditNew, BatchCreditResponse, BatchCreditResult, CheckStatusResponse, SyncResponse,
    TransactionCreated, TransactionKind as ApiKind, TransactionListQuery, TransactionListResponse,
    TransactionNew, TransactionStatus as ApiStatus, TransactionUpdate, TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Recharge => ApiKind::Recharge,
        engine::TransactionKind::AddFund => ApiKind::AddFund,
        engine::TransactionKind::Transfer => ApiKind::Transfer,
        engine::TransactionKind::Referral => ApiKind::Referral,
        engine::TransactionKind::Cashback => ApiKind::Cashback,
        engine::TransactionKind::Debit => ApiKind::Debit,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Recharge => engine::TransactionKind::Recharge,
        ApiKind::AddFund => engine::TransactionKind::AddFund,
        ApiKind::Transfer => engine::TransactionKind::Transfer,
        ApiKind::Referral => engine::TransactionKind::Referral,
        ApiKind::Cashback => engine::TransactionKind::Cashback,
        ApiKind::Debit => engine::TransactionKind::Debit,
    }
}

fn map_status(status: engine::TransactionStatus) -> ApiStatus {
    match status {
        engine::TransactionStatus::Pending => ApiStatus::Pending,
        engine::TransactionStatus::Success => ApiStatus::Success,
        engine::TransactionStatus::Failed => ApiStatus::Failed,
        engine::TransactionStatus::Refund => ApiStatus::Refund,
    }
}

fn map_api_status(status: ApiStatus) -> engine::TransactionStatus {
    match status {
        ApiStatus::Pending => engine::TransactionStatus::Pending,
        ApiStatus::Success => engine::TransactionStatus::Success,
        ApiStatus::Failed => engine::TransactionStatus::Failed,
        ApiStatus::Refund => engine::TransactionStatus::Refund,
    }
}

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        gateway_ref: tx.gateway_ref,
        user_id: tx.user_id,
        kind: map_kind(tx.kind),
        status: map_status(tx.status),
        amount_minor: tx.amount.minor(),
        operator_id: tx.operator_id,
        recipient_id: tx.recipient_id,
        description: tx.description,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let mut cmd = engine::CreateTransactionCmd::new(
        payload.user_id,
        map_api_kind(payload.kind),
        map_api_status(payload.status),
        payload.amount_minor,
    );
    cmd.operator_id = payload.operator_id;
    cmd.recipient_ids = payload.recipient_ids.unwrap_or_default();
    cmd.gateway_ref = payload.gateway_ref;
    cmd.description = payload.description;
    cmd.ip_address = payload.ip_address;
    cmd.device_info = payload.device_info;

    let created = state.engine.create_transaction(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            transactions: created.into_iter().map(view).collect(),
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(50).min(500);
    let filter = engine::TransactionListFilter {
        user_id: query.user_id,
        from: query.from,
        to: query.to,
        kinds: query.kind.map(|k| vec![map_api_kind(k)]),
        statuses: query.status.map(|s| vec![map_api_status(s)]),
    };

    let (transactions, next_cursor) = state
        .engine
        .list_transactions(limit, query.cursor.as_deref(), &filter)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(view).collect(),
        next_cursor,
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = engine::ApplyTransitionCmd::new(id, map_api_status(payload.status))
        .refund_requested(payload.refund_requested.unwrap_or(false));
    cmd.description = payload.description;

    let updated = state.engine.apply_transition(cmd).await?;
    Ok(Json(view(updated)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_status(
    State(state): State<ServerState>,
    Path(gateway_ref): Path<String>,
) -> Result<Json<CheckStatusResponse>, ServerError> {
    let check = state.engine.check_status(&gateway_ref).await?;

    Ok(Json(CheckStatusResponse {
        success: check.success,
        api_response: check.api_response,
        mapped_status: check.mapped_status.map(map_status),
    }))
}

pub async fn sync_from_gateway(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SyncResponse>, ServerError> {
    let outcome = state.engine.sync_from_gateway(id).await?;

    let response = match outcome {
        engine::SyncOutcome::Updated {
            previous,
            new,
            transaction,
        } => SyncResponse {
            success: true,
            status_updated: true,
            record_found: true,
            previous_status: Some(map_status(previous)),
            new_status: Some(map_status(new)),
            transaction: Some(view(transaction)),
        },
        engine::SyncOutcome::NoChangeNeeded => SyncResponse {
            success: true,
            status_updated: false,
            record_found: true,
            previous_status: None,
            new_status: None,
            transaction: None,
        },
        engine::SyncOutcome::NotFound => SyncResponse {
            success: true,
            status_updated: false,
            record_found: false,
            previous_status: None,
            new_status: None,
            transaction: None,
        },
    };

    Ok(Json(response))
}

pub async fn batch_credit(
    State(state): State<ServerState>,
    Json(payload): Json<BatchCreditNew>,
) -> Result<Json<BatchCreditResponse>, ServerError> {
    if payload.items.is_empty() {
        return Err(ServerError::Generic("items must not be empty".to_string()));
    }

    let items = payload
        .items
        .into_iter()
        .map(|item| {
            let mut cmd = engine::BatchCreditItem::new(
                item.user_id,
                map_api_kind(item.kind),
                item.amount_minor,
            );
            cmd.description = item.description;
            cmd
        })
        .collect();

    let outcomes = state.engine.batch_credit(items).await;

    let results = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(tx) => BatchCreditResult {
                user_id: outcome.user_id,
                ok: true,
                transaction: Some(view(tx)),
                error: None,
            },
            Err(err) => BatchCreditResult {
                user_id: outcome.user_id,
                ok: false,
                transaction: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    Ok(Json(BatchCreditResponse { results }))
}
