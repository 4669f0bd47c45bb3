//! Operator API endpoints (reference data seeding/listing)

use api_types::operator::{OperatorKind as ApiKind, OperatorNew, OperatorView, OperatorsResponse};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::OperatorKind) -> ApiKind {
    match kind {
        engine::OperatorKind::Mobile => ApiKind::Mobile,
        engine::OperatorKind::Dth => ApiKind::Dth,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::OperatorKind {
    match kind {
        ApiKind::Mobile => engine::OperatorKind::Mobile,
        ApiKind::Dth => engine::OperatorKind::Dth,
    }
}

fn view(operator: engine::Operator) -> OperatorView {
    OperatorView {
        id: operator.id,
        code: operator.code,
        kind: map_kind(operator.kind),
        commission_bps: operator.commission_bps,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OperatorNew>,
) -> Result<(StatusCode, Json<OperatorView>), ServerError> {
    let operator = state
        .engine
        .create_operator(
            &payload.id,
            &payload.code,
            map_api_kind(payload.kind),
            payload.commission_bps,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(operator))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<OperatorsResponse>, ServerError> {
    let operators = state.engine.operators().await?;
    Ok(Json(OperatorsResponse {
        operators: operators.into_iter().map(view).collect(),
    }))
}
