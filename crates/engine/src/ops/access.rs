use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, goals, pdf_records, transactions, users};

use super::Engine;

/// Generates a `require_*` lookup returning the model or `KeyNotFound`.
macro_rules! impl_require_by_id {
    ($require_fn:ident, $entity:path, $model:path, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_by_id!(require_user, users::Entity, users::Model, "user not exists");
    impl_require_by_id!(require_goal, goals::Entity, goals::Model, "goal not exists");
    impl_require_by_id!(
        require_transaction,
        transactions::Entity,
        transactions::Model,
        "transaction not exists"
    );
    impl_require_by_id!(
        require_pdf_record,
        pdf_records::Entity,
        pdf_records::Model,
        "pdf record not exists"
    );

    /// Check that `user_id` references an existing user before inserting an
    /// entity owned by it. A missing owner is a `Validation` error.
    pub(super) async fn require_owner(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::Validation(format!(
                "user {user_id} does not exist"
            )));
        }
        Ok(())
    }

    /// Return `true` if `email` is used by a user other than `except`.
    pub(super) async fn email_taken(
        &self,
        db: &DatabaseTransaction,
        email: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<bool> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(users::Column::Id.ne(id.to_string()));
        }
        Ok(query.one(db).await?.is_some())
    }
}
