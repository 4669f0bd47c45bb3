use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::{EngineError, Operator, OperatorKind, ResultEngine, operators};

use super::{Engine, with_tx};

impl Engine {
    /// Seeds an operator. Operators are reference data; there is no update
    /// or delete path.
    pub async fn create_operator(
        &self,
        id: &str,
        code: &str,
        kind: OperatorKind,
        commission_bps: i64,
    ) -> ResultEngine<Operator> {
        let id = id.trim();
        let code = code.trim();
        if id.is_empty() || code.is_empty() {
            return Err(EngineError::InvalidAmount(
                "operator id and code must not be empty".to_string(),
            ));
        }
        if !(0..=10_000).contains(&commission_bps) {
            return Err(EngineError::InvalidAmount(
                "commission_bps must be between 0 and 10000".to_string(),
            ));
        }

        let operator = Operator {
            id: id.to_string(),
            code: code.to_string(),
            kind,
            commission_bps,
        };

        with_tx!(self, |db_tx| {
            let existing = operators::Entity::find_by_id(id).one(&db_tx).await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(id.to_string()));
            }
            let same_code = operators::Entity::find()
                .filter(operators::Column::Code.eq(code))
                .one(&db_tx)
                .await?;
            if same_code.is_some() {
                return Err(EngineError::ExistingKey(code.to_string()));
            }
            operators::ActiveModel::from(&operator).insert(&db_tx).await?;
            Ok(operator)
        })
    }

    /// Lists all operators, ordered by code.
    pub async fn operators(&self) -> ResultEngine<Vec<Operator>> {
        let models = operators::Entity::find()
            .order_by_asc(operators::Column::Code)
            .all(&self.database)
            .await?;
        models.into_iter().map(Operator::try_from).collect()
    }

    pub(super) async fn require_operator(
        &self,
        db_tx: &DatabaseTransaction,
        operator_id: &str,
    ) -> ResultEngine<operators::Model> {
        operators::Entity::find_by_id(operator_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::OperatorNotFound(operator_id.to_string()))
    }
}
