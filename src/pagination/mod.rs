//! Comment pagination and tree-reconstruction engine.
//!
//! One `fetch_comment_page` call is a self-contained, stateless read:
//! it builds a range descriptor, performs exactly one storage fetch
//! (over-fetching a single row to detect further pages), reassembles
//! the reply tree from the flat result, and computes page metadata.
//! Nothing is cached or retried across calls.

mod cursor;
mod page;
mod range;
mod tree;

pub use cursor::{decode_cursor, encode_cursor};
pub use range::{CommentPageArgs, CommentRangeQuery, OrderDirection};

use async_trait::async_trait;

use crate::error::{PageError, StorageError};
use crate::models::{Comment, CommentConnection};

/// Storage port for the pagination engine. Implementations return rows
/// already filtered, ordered, and limited per the descriptor.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn fetch_comment_rows(
        &self,
        query: &CommentRangeQuery,
    ) -> Result<Vec<Comment>, StorageError>;
}

/// Read-path service producing one comment page per call.
pub struct CommentPager<'a, S> {
    store: &'a S,
}

impl<'a, S: CommentStore> CommentPager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetches one page of comments for a post.
    ///
    /// Bounds are validated and cursors decoded before storage is
    /// touched; a storage failure surfaces as-is with no partial
    /// result. When both `first` and `last` are supplied, `first` wins
    /// and the call paginates forward.
    pub async fn fetch_comment_page(
        &self,
        args: CommentPageArgs,
    ) -> Result<CommentConnection, PageError> {
        let query = CommentRangeQuery::build(&args)?;
        let rows = self.store.fetch_comment_rows(&query).await?;
        let window = tree::reassemble(rows, args.bound());
        Ok(page::connection(window, &args))
    }
}
