//! User API endpoints

use api_types::user::{BalanceResponse, UserNew, UserView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .create_user(
            &payload.id,
            &payload.name,
            payload.opening_balance_minor.unwrap_or(0),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserView {
            id: user.id,
            name: user.name,
            wallet_balance_minor: user.wallet_balance.minor(),
        }),
    ))
}

pub async fn balance(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let balance = state.engine.wallet_balance(&user_id).await?;

    Ok(Json(BalanceResponse {
        user_id,
        wallet_balance_minor: balance.minor(),
    }))
}
