use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, PasswordHash, ResultEngine, User, UserNew, UserUpdate, users,
    util::{normalize_email, normalize_required_text, parse_uuid},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a new user.
    ///
    /// The email must be unique (case-insensitive). When a password is given
    /// it is stored as a salted bcrypt hash; an empty password counts as none.
    pub async fn new_user(&self, cmd: UserNew) -> ResultEngine<User> {
        let user_name = normalize_required_text(&cmd.user_name, "user_name")?;
        let email = normalize_email(&cmd.email)?;
        let password = match cmd.password {
            Some(raw) if !raw.is_empty() => {
                let cost = self.password_cost;
                Some(
                    blocking(move || PasswordHash::from_raw_password(&raw, cost)).await?,
                )
            }
            _ => None,
        };

        let user = User::new(user_name, email, password, Utc::now());
        with_tx!(self, |db_tx| {
            if self.email_taken(&db_tx, &user.email, None).await? {
                return Err(EngineError::ExistingKey(user.email));
            }
            users::ActiveModel::from(&user).insert(&db_tx).await?;
            tracing::debug!("created user {}", user.id);
            Ok(user)
        })
    }

    /// Return every user, oldest first.
    pub async fn users(&self) -> ResultEngine<Vec<User>> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(User::try_from).collect()
    }

    pub async fn user(&self, user_id: &str) -> ResultEngine<User> {
        let user_id = parse_uuid(user_id, "user")?;
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            User::try_from(model)
        })
    }

    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_required_text(email, "email")?.to_lowercase();
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(email))?;
        User::try_from(model)
    }

    /// Return `true` if a user with `email` exists and is blocked.
    ///
    /// Unknown emails are not blocked.
    pub async fn is_email_blocked(&self, email: &str) -> ResultEngine<bool> {
        let email = normalize_required_text(email, "email")?.to_lowercase();
        let blocked = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::IsBlocked.eq(true))
            .one(&self.database)
            .await?
            .is_some();
        Ok(blocked)
    }

    /// Update name, email and blocked flag of a user.
    pub async fn update_user(&self, user_id: &str, update: UserUpdate) -> ResultEngine<User> {
        let user_id = parse_uuid(user_id, "user")?;
        let user_name = update
            .user_name
            .as_deref()
            .map(|name| normalize_required_text(name, "user_name"))
            .transpose()?;
        let email = update.email.as_deref().map(normalize_email).transpose()?;

        with_tx!(self, |db_tx| {
            let current = self.require_user(&db_tx, user_id).await?;
            if let Some(email) = &email
                && *email != current.email
                && self.email_taken(&db_tx, email, Some(user_id)).await?
            {
                return Err(EngineError::ExistingKey(email.clone()));
            }

            let active = users::ActiveModel {
                id: ActiveValue::Set(current.id),
                user_name: user_name.map_or(ActiveValue::NotSet, ActiveValue::Set),
                email: email.map_or(ActiveValue::NotSet, ActiveValue::Set),
                is_blocked: update
                    .is_blocked
                    .map_or(ActiveValue::NotSet, ActiveValue::Set),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }

    /// Check `raw_password` against the stored hash of the user owning `email`.
    ///
    /// Users created without a password never match.
    pub async fn verify_password(&self, email: &str, raw_password: &str) -> ResultEngine<bool> {
        let user = self.user_by_email(email).await?;
        match user.password {
            Some(hash) => {
                let raw_password = raw_password.to_string();
                blocking(move || hash.verify(&raw_password)).await
            }
            None => Ok(false),
        }
    }
}

/// Run bcrypt off the async workers.
async fn blocking<T, F>(work: F) -> ResultEngine<T>
where
    F: FnOnce() -> ResultEngine<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| EngineError::PasswordHash(err.to_string()))?
}
