//! Error types for the board backend.
//!
//! Three layers, converted automatically via `From` so `?` works across
//! boundaries:
//!
//! - [`StorageError`] - database/repository failures
//! - [`PageError`] - comment pagination engine errors
//! - [`ApiError`] - resolver-facing errors with a GraphQL `code` extension

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Persistence failures. The pagination engine never retries these;
/// they surface to the caller as-is.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced by the comment pagination engine.
#[derive(Debug, Error)]
pub enum PageError {
    /// An `after`/`before` value failed to parse as a canonical
    /// RFC 3339 timestamp. Raised before any storage access.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// A negative or otherwise nonsensical page bound. Raised before
    /// cursor decoding and storage access.
    #[error("validation error: {0}")]
    Validation(String),

    /// The storage collaborator failed; propagated without retry and
    /// without partial results.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Resolver-layer errors for the auth and CRUD surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) | Self::Page(PageError::Validation(_)) => "BAD_REQUEST",
            Self::Page(PageError::InvalidCursor(_)) => "INVALID_CURSOR",
            Self::Page(PageError::Storage(_)) | Self::Storage(_) => "INTERNAL",
            Self::Token(_) => "UNAUTHORIZED",
            Self::Hash(_) => "INTERNAL",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string())
            .extend_with(|_, e| e.set("code", self.code()))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
