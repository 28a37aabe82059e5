use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use sqlx::MySqlPool;

use crate::error::{ApiError, ApiResult, StorageError};
use crate::models::{LoginInput, RegisterInput, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, input: &RegisterInput) -> ApiResult<User> {
        let email = input.email.trim().to_lowercase();
        let username = input.username.trim();
        if email.is_empty() || username.is_empty() || input.password.is_empty() {
            return Err(ApiError::Validation(
                "email, username and password are required".to_string(),
            ));
        }

        let existing =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? OR username = ?")
                .bind(&email)
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::from)?;

        if existing.is_some() {
            return Err(ApiError::Validation(
                "email or username already registered".to_string(),
            ));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)?;

        let result = sqlx::query(
            "INSERT INTO users (email, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&email)
        .bind(username)
        .bind(&password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_register_insert_error)?;

        self.user_by_id(result.last_insert_id() as i64).await
    }

    pub async fn login(&self, input: &LoginInput) -> ApiResult<User> {
        let email = input.email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?
            .ok_or_else(|| ApiError::Unauthorized("invalid email or password".to_string()))?;

        if !verify(&input.password, &user.password_hash)? {
            return Err(ApiError::Unauthorized(
                "invalid email or password".to_string(),
            ));
        }

        Ok(user)
    }

    pub async fn user_by_id(&self, id: i64) -> ApiResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
    }
}

/// The pre-insert uniqueness SELECT races with concurrent registrations;
/// a duplicate that slips past it lands on the unique index instead and
/// must read as the same validation failure.
fn map_register_insert_error(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return ApiError::Validation("email or username already registered".to_string());
        }
    }
    ApiError::Storage(StorageError::Database(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct DuplicateKey;

    impl fmt::Display for DuplicateKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Duplicate entry 'a@b.c' for key 'users.email'")
        }
    }

    impl StdError for DuplicateKey {}

    impl DatabaseError for DuplicateKey {
        fn message(&self) -> &str {
            "Duplicate entry"
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn concurrent_duplicate_registration_reads_as_validation() {
        let err = map_register_insert_error(sqlx::Error::Database(Box::new(DuplicateKey)));
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn other_insert_failures_stay_storage_errors() {
        let err = map_register_insert_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
