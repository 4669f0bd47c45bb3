use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod operators;
mod server;
mod transactions;
mod users;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{
            BatchCreditNew, BatchCreditResponse, BatchCreditResult, CheckStatusResponse,
            SyncResponse, TransactionCreated, TransactionListQuery, TransactionListResponse,
            TransactionNew, TransactionUpdate, TransactionView,
        };
    }

    pub mod user {
        pub use api_types::user::{BalanceResponse, UserNew, UserView};
    }

    pub mod operator {
        pub use api_types::operator::{OperatorNew, OperatorView, OperatorsResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::UserNotFound(_)
        | EngineError::OperatorNotFound(_)
        | EngineError::RecipientNotFound(_)
        | EngineError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::AlreadyApplied(_) => StatusCode::CONFLICT,
        EngineError::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InsufficientFunds(_)
        | EngineError::IllegalTransition(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidCursor(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
