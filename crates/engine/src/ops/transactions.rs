use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Transaction, TransactionNew, transactions,
    util::{normalize_optional_text, normalize_required_text, parse_uuid},
};

use super::{Engine, with_tx};

impl Engine {
    /// Record a new income/expense for an existing user.
    pub async fn new_transaction(&self, cmd: TransactionNew) -> ResultEngine<Transaction> {
        let user_id = parse_uuid(&cmd.user_id, "user")?;
        let description = normalize_required_text(&cmd.description, "description")?;
        let tx = Transaction::new(
            user_id,
            cmd.transaction_date,
            cmd.is_expense,
            cmd.amount_minor,
            description,
            normalize_optional_text(cmd.category.as_deref()),
            normalize_optional_text(cmd.merchant.as_deref()),
        )?;

        with_tx!(self, |db_tx| {
            self.require_owner(&db_tx, user_id).await?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }

    pub async fn transaction(&self, transaction_id: &str) -> ResultEngine<Transaction> {
        let transaction_id = parse_uuid(transaction_id, "transaction")?;
        with_tx!(self, |db_tx| {
            let model = self.require_transaction(&db_tx, transaction_id).await?;
            Transaction::try_from(model)
        })
    }

    /// List the transactions of a user, most recent `transaction_date` first.
    ///
    /// A user without transactions (or an unknown user) yields an empty list.
    pub async fn transactions_for_user(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        let user_id = parse_uuid(user_id, "user")?;
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    pub async fn delete_transaction(&self, transaction_id: &str) -> ResultEngine<()> {
        let transaction_id = parse_uuid(transaction_id, "transaction")?;
        with_tx!(self, |db_tx| {
            let res = transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;
            if res.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(
                    "transaction not exists".to_string(),
                ));
            }
            Ok(())
        })
    }
}
