//! The module contains the representation of a savings goal.
//!
//! A goal is a savings target with a running balance. The balance is bounded
//! below by zero and only moves through deposits and withdrawals, which the
//! engine applies as single conditional updates in the store.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::require_positive_amount};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Build a new goal, enforcing:
    ///
    /// - `target_amount_minor > 0`
    /// - `current_amount_minor >= 0`
    /// - `end_date >= start_date`
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        user_id: Uuid,
        title: String,
        target_amount_minor: i64,
        current_amount_minor: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        description: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        require_positive_amount(target_amount_minor, "target_amount_minor")?;
        if current_amount_minor < 0 {
            return Err(EngineError::Validation(
                "current_amount_minor must be >= 0".to_string(),
            ));
        }
        if end_date < start_date {
            return Err(EngineError::Validation(format!(
                "end_date {end_date} is before start_date {start_date}"
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            target_amount_minor,
            current_amount_minor,
            start_date,
            end_date,
            description,
            created_at,
        })
    }

    pub fn is_reached(&self) -> bool {
        self.current_amount_minor >= self.target_amount_minor
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub start_date: Date,
    pub end_date: Date,
    pub description: String,
    pub created_at: DateTimeUtc,
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

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            user_id: ActiveValue::Set(goal.user_id.to_string()),
            title: ActiveValue::Set(goal.title.clone()),
            target_amount_minor: ActiveValue::Set(goal.target_amount_minor),
            current_amount_minor: ActiveValue::Set(goal.current_amount_minor),
            start_date: ActiveValue::Set(goal.start_date),
            end_date: ActiveValue::Set(goal.end_date),
            description: ActiveValue::Set(goal.description.clone()),
            created_at: ActiveValue::Set(goal.created_at),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("goal not exists".to_string()))?,
            user_id: Uuid::parse_str(&model.user_id)
                .map_err(|_| EngineError::KeyNotFound("user not exists".to_string()))?,
            title: model.title,
            target_amount_minor: model.target_amount_minor,
            current_amount_minor: model.current_amount_minor,
            start_date: model.start_date,
            end_date: model.end_date,
            description: model.description,
            created_at: model.created_at,
        })
    }
}
