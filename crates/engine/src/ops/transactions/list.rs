use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind, TransactionStatus, transactions,
};

use super::super::{Engine, with_tx};

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub user_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, acts as an allow-list of kinds to return.
    pub kinds: Option<Vec<TransactionKind>>,
    /// If present, acts as an allow-list of statuses to return.
    pub statuses: Option<Vec<TransactionStatus>>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidAmount(
            "invalid range: from must be < to".to_string(),
        ));
    }
    if filter.kinds.as_ref().is_some_and(|k| k.is_empty()) {
        return Err(EngineError::InvalidAmount(
            "kinds must not be empty".to_string(),
        ));
    }
    if filter.statuses.as_ref().is_some_and(|s| s.is_empty()) {
        return Err(EngineError::InvalidAmount(
            "statuses must not be empty".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(user_id) = &filter.user_id {
            self = self.filter(transactions::Column::UserId.eq(user_id.clone()));
        }
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::CreatedAt.lt(to));
        }
        if let Some(kinds) = &filter.kinds {
            let kinds: Vec<String> = kinds.iter().map(|k| k.as_str().to_string()).collect();
            self = self.filter(transactions::Column::Kind.is_in(kinds));
        }
        if let Some(statuses) = &filter.statuses {
            let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
            self = self.filter(transactions::Column::Status.is_in(statuses));
        }

        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    created_at: DateTime<Utc>,
    transaction_id: String,
}

impl TransactionsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))
    }
}

impl Engine {
    /// Returns a single transaction.
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::TransactionNotFound(transaction_id.to_string()))?;
        Transaction::try_from(model)
    }

    /// Returns a transaction by its external gateway reference.
    pub async fn transaction_by_gateway_ref(&self, gateway_ref: &str) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find()
            .filter(transactions::Column::GatewayRef.eq(gateway_ref))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::TransactionNotFound(gateway_ref.to_string()))?;
        Transaction::try_from(model)
    }

    /// Lists transactions with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(created_at DESC, id DESC)`.
    pub async fn list_transactions(
        &self,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<(Vec<Transaction>, Option<String>)> {
        with_tx!(self, |db_tx| {
            validate_list_filter(filter)?;

            let limit_plus_one = limit.saturating_add(1);
            let mut query = transactions::Entity::find()
                .order_by_desc(transactions::Column::CreatedAt)
                .order_by_desc(transactions::Column::Id)
                .limit(limit_plus_one);

            if let Some(cursor) = cursor {
                let cursor = TransactionsCursor::decode(cursor)?;
                query = query.filter(
                    Condition::any()
                        .add(transactions::Column::CreatedAt.lt(cursor.created_at))
                        .add(
                            Condition::all()
                                .add(transactions::Column::CreatedAt.eq(cursor.created_at))
                                .add(transactions::Column::Id.lt(cursor.transaction_id)),
                        ),
                );
            }
            query = query.apply_tx_filters(filter);

            let rows: Vec<transactions::Model> = query.all(&db_tx).await?;
            let has_more = rows.len() > limit as usize;

            let mut out: Vec<Transaction> = Vec::with_capacity(rows.len().min(limit as usize));
            for model in rows.into_iter().take(limit as usize) {
                out.push(Transaction::try_from(model)?);
            }

            let next_cursor = out.last().map(|tx| TransactionsCursor {
                created_at: tx.created_at,
                transaction_id: tx.id.to_string(),
            });
            let next_cursor = if has_more {
                next_cursor.map(|c| c.encode()).transpose()?
            } else {
                None
            };

            Ok((out, next_cursor))
        })
    }
}
