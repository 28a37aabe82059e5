use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, SimpleObject)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    #[graphql(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, InputObject)]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Returned by the register and login mutations.
#[derive(Debug, Serialize, SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}
