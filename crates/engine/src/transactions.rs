//! Transaction primitives.
//!
//! A `Transaction` is an income or expense entry recorded for a user. It is
//! never mutated once stored: it can only be deleted.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::require_positive_amount};

/// Category used when the client does not send one.
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transaction_date: DateTime<Utc>,
    pub is_expense: bool,
    pub amount_minor: i64,
    pub description: String,
    pub category: String,
    pub merchant: Option<String>,
}

impl Transaction {
    pub(crate) fn new(
        user_id: Uuid,
        transaction_date: DateTime<Utc>,
        is_expense: bool,
        amount_minor: i64,
        description: String,
        category: Option<String>,
        merchant: Option<String>,
    ) -> ResultEngine<Self> {
        require_positive_amount(amount_minor, "amount_minor")?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            transaction_date,
            is_expense,
            amount_minor,
            description,
            category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            merchant,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub transaction_date: DateTimeUtc,
    pub is_expense: bool,
    pub amount_minor: i64,
    pub description: String,
    pub category: String,
    pub merchant: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.to_string()),
            transaction_date: ActiveValue::Set(tx.transaction_date),
            is_expense: ActiveValue::Set(tx.is_expense),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            description: ActiveValue::Set(tx.description.clone()),
            category: ActiveValue::Set(tx.category.clone()),
            merchant: ActiveValue::Set(tx.merchant.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            user_id: Uuid::parse_str(&model.user_id)
                .map_err(|_| EngineError::KeyNotFound("user not exists".to_string()))?,
            transaction_date: model.transaction_date,
            is_expense: model.is_expense,
            amount_minor: model.amount_minor,
            description: model.description,
            category: model.category,
            merchant: model.merchant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_non_positive_amounts() {
        for amount in [0, -100] {
            let res = Transaction::new(
                Uuid::new_v4(),
                Utc::now(),
                true,
                amount,
                "Groceries".to_string(),
                None,
                None,
            );
            assert_eq!(
                res,
                Err(EngineError::Validation("amount_minor must be > 0".to_string()))
            );
        }
    }

    #[test]
    fn new_defaults_category() {
        let tx = Transaction::new(
            Uuid::new_v4(),
            Utc::now(),
            true,
            1250,
            "Groceries".to_string(),
            None,
            Some("Coop".to_string()),
        )
        .unwrap();

        assert_eq!(tx.category, DEFAULT_CATEGORY);
        assert_eq!(tx.merchant.as_deref(), Some("Coop"));
    }
}
