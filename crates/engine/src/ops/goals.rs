use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, Goal, GoalNew, Money, ResultEngine, goals,
    util::{normalize_required_text, parse_uuid, require_positive_amount},
};

use super::{Engine, with_tx};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BalanceChange {
    Deposit,
    Withdraw,
}

impl Engine {
    /// Create a savings goal for an existing user.
    pub async fn new_goal(&self, cmd: GoalNew) -> ResultEngine<Goal> {
        let user_id = parse_uuid(&cmd.user_id, "user")?;
        let title = normalize_required_text(&cmd.title, "title")?;
        let goal = Goal::new(
            user_id,
            title,
            cmd.target_amount_minor,
            cmd.current_amount_minor.unwrap_or(0),
            cmd.start_date,
            cmd.end_date,
            cmd.description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            Utc::now(),
        )?;

        with_tx!(self, |db_tx| {
            self.require_owner(&db_tx, user_id).await?;
            goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    pub async fn goal(&self, goal_id: &str) -> ResultEngine<Goal> {
        let goal_id = parse_uuid(goal_id, "goal")?;
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, goal_id).await?;
            Goal::try_from(model)
        })
    }

    /// List the goals of a user, oldest first. Empty when the user has none.
    pub async fn goals_for_user(&self, user_id: &str) -> ResultEngine<Vec<Goal>> {
        let user_id = parse_uuid(user_id, "user")?;
        let models = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(goals::Column::CreatedAt)
            .order_by_asc(goals::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(Goal::try_from).collect()
    }

    /// Add `amount_minor` to the goal balance and return the updated goal.
    pub async fn deposit(&self, goal_id: &str, amount_minor: i64) -> ResultEngine<Goal> {
        self.change_goal_balance(goal_id, amount_minor, BalanceChange::Deposit)
            .await
    }

    /// Take `amount_minor` from the goal balance and return the updated goal.
    ///
    /// Fails with `InsufficientFunds` (leaving the balance untouched) when the
    /// amount exceeds the current balance.
    pub async fn withdraw(&self, goal_id: &str, amount_minor: i64) -> ResultEngine<Goal> {
        self.change_goal_balance(goal_id, amount_minor, BalanceChange::Withdraw)
            .await
    }

    pub async fn delete_goal(&self, goal_id: &str) -> ResultEngine<()> {
        let goal_id = parse_uuid(goal_id, "goal")?;
        with_tx!(self, |db_tx| {
            let res = goals::Entity::delete_by_id(goal_id.to_string())
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("goal not exists".to_string()));
            }
            Ok(())
        })
    }

    /// Apply a deposit/withdrawal as one conditional `UPDATE`.
    ///
    /// The guard (`balance >= amount` for withdrawals, no `i64` overflow for
    /// deposits) and the write are evaluated by the store in the same
    /// statement, so concurrent changes on the same goal can't interleave
    /// between the check and the update. When no row matches we re-read the
    /// goal only to pick the right error.
    async fn change_goal_balance(
        &self,
        goal_id: &str,
        amount_minor: i64,
        change: BalanceChange,
    ) -> ResultEngine<Goal> {
        let goal_id = parse_uuid(goal_id, "goal")?;
        require_positive_amount(amount_minor, "amount_minor")?;

        with_tx!(self, |db_tx| {
            let balance = Expr::col(goals::Column::CurrentAmountMinor);
            let update = goals::Entity::update_many()
                .filter(goals::Column::Id.eq(goal_id.to_string()));
            let update = match change {
                BalanceChange::Deposit => update
                    .col_expr(goals::Column::CurrentAmountMinor, balance.add(amount_minor))
                    .filter(goals::Column::CurrentAmountMinor.lte(i64::MAX - amount_minor)),
                BalanceChange::Withdraw => update
                    .col_expr(goals::Column::CurrentAmountMinor, balance.sub(amount_minor))
                    .filter(goals::Column::CurrentAmountMinor.gte(amount_minor)),
            };

            let res = update.exec(&db_tx).await?;
            if res.rows_affected == 0 {
                let current = self.require_goal(&db_tx, goal_id).await?;
                return Err(rejected_change(goal_id, &current, amount_minor, change));
            }

            let model = self.require_goal(&db_tx, goal_id).await?;
            tracing::debug!(
                "{change:?} of {} on goal {goal_id}, balance now {}",
                Money::new(amount_minor),
                Money::new(model.current_amount_minor)
            );
            Goal::try_from(model)
        })
    }
}

fn rejected_change(
    goal_id: Uuid,
    current: &goals::Model,
    amount_minor: i64,
    change: BalanceChange,
) -> EngineError {
    match change {
        BalanceChange::Deposit => EngineError::Validation(format!(
            "deposit of {} would overflow goal {goal_id}",
            Money::new(amount_minor)
        )),
        BalanceChange::Withdraw => EngineError::InsufficientFunds(format!(
            "goal {goal_id} holds {}, cannot withdraw {}",
            Money::new(current.current_amount_minor),
            Money::new(amount_minor)
        )),
    }
}
