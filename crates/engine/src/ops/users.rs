use sea_orm::{QueryFilter, SqlErr, prelude::*};

use crate::{EngineError, ResultEngine, User, password, users};

use super::{Engine, normalize_required};

impl Engine {
    /// Register a new user and return its id.
    ///
    /// The password is stored as an Argon2 hash. A taken username or email
    /// yields [`EngineError::ExistingKey`] without touching the table; the
    /// database does not say which of the two collided, so callers that care
    /// re-query with [`Engine::find_user_by_username`] or
    /// [`Engine::find_user_by_email`].
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ResultEngine<i64> {
        let username = normalize_required(username, "username")?;
        let email = normalize_required(email, "email")?;
        if password.is_empty() {
            return Err(EngineError::invalid_field("password", "must not be empty"));
        }

        let hash = password::hash_password(password)?;
        let model = users::ActiveModel::new_user(username, email, hash);
        match model.insert(&self.database).await {
            Ok(user) => Ok(user.id),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(EngineError::ExistingKey("username or email".to_string()))
                }
                _ => Err(err.into()),
            },
        }
    }

    pub async fn find_user_by_username(&self, username: &str) -> ResultEngine<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username.trim()))
            .one(&self.database)
            .await?;
        Ok(user.map(User::from))
    }

    pub async fn find_user_by_email(&self, email: &str) -> ResultEngine<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim()))
            .one(&self.database)
            .await?;
        Ok(user.map(User::from))
    }

    /// Check credentials and return the matching user.
    ///
    /// Unknown usernames and wrong passwords produce the same
    /// [`EngineError::InvalidCredentials`].
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        let user = self
            .find_user_by_username(username)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;

        if !password::verify_password(password, &user.password_hash)? {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(user)
    }
}
