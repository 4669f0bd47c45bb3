use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, TransactionTrait};

use crate::{EngineError, Money, ResultEngine, User, users};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Seeds a user with an opening wallet balance.
    pub async fn create_user(
        &self,
        id: &str,
        name: &str,
        opening_balance_minor: i64,
    ) -> ResultEngine<User> {
        let id = id.trim();
        if id.is_empty() {
            return Err(EngineError::InvalidAmount(
                "user id must not be empty".to_string(),
            ));
        }
        let opening_balance = Money::new(opening_balance_minor);
        if opening_balance.is_negative() {
            return Err(EngineError::InvalidAmount(
                "opening balance must be >= 0".to_string(),
            ));
        }

        let user = User {
            id: id.to_string(),
            name: normalize_optional_text(Some(name)).unwrap_or_else(|| id.to_string()),
            wallet_balance: opening_balance,
        };

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(id).one(&db_tx).await?.is_some() {
                return Err(EngineError::ExistingKey(id.to_string()));
            }
            users::ActiveModel::from(&user).insert(&db_tx).await?;
            Ok(user)
        })
    }

    /// Returns a user with their current wallet balance.
    pub async fn user(&self, user_id: &str) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))?;
        Ok(User::from(model))
    }

    /// Current wallet balance; the wallet store's read side.
    pub async fn wallet_balance(&self, user_id: &str) -> ResultEngine<Money> {
        Ok(self.user(user_id).await?.wallet_balance)
    }

    pub(super) async fn require_user(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))
    }

    pub(super) async fn require_recipient(
        &self,
        db_tx: &DatabaseTransaction,
        recipient_id: &str,
    ) -> ResultEngine<()> {
        users::Entity::find_by_id(recipient_id)
            .one(db_tx)
            .await?
            .map(|_| ())
            .ok_or_else(|| EngineError::RecipientNotFound(recipient_id.to_string()))
    }
}
