use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{ResultEngine, goals, pdf_records, transactions, users, util::parse_uuid};

use super::{Engine, with_tx};

/// What a user deletion removed from the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub transactions: u64,
    pub goals: u64,
    pub pdf_records: u64,
    /// Paths of the report files that belonged to the deleted records. The
    /// files are still on disk.
    pub files: Vec<String>,
}

impl Engine {
    /// Delete a user together with its transactions, goals and report records.
    ///
    /// Everything happens in one store transaction: either the user and all of
    /// its dependents are gone, or nothing is.
    pub async fn delete_user(&self, user_id: &str) -> ResultEngine<CascadeReport> {
        let user_id = parse_uuid(user_id, "user")?;
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;

            let files = pdf_records::Entity::find()
                .filter(pdf_records::Column::UserId.eq(user.id.as_str()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|record| record.file_path)
                .collect();

            let transactions = transactions::Entity::delete_many()
                .filter(transactions::Column::UserId.eq(user.id.as_str()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            let goals = goals::Entity::delete_many()
                .filter(goals::Column::UserId.eq(user.id.as_str()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            let pdf_records = pdf_records::Entity::delete_many()
                .filter(pdf_records::Column::UserId.eq(user.id.as_str()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            users::Entity::delete_by_id(user.id.clone())
                .exec(&db_tx)
                .await?;

            tracing::info!(
                "deleted user {user_id}: {transactions} transactions, {goals} goals, {pdf_records} reports"
            );
            Ok(CascadeReport {
                transactions,
                goals,
                pdf_records,
                files,
            })
        })
    }
}
