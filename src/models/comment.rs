use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum comment body length in characters.
pub const MAX_COMMENT_BODY_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, SimpleObject)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub parent_comment_id: Option<i64>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Direct replies, populated only by tree reassembly. Not a column.
    #[sqlx(skip)]
    pub replies: Vec<Comment>,
}

/// A comment plus its position cursor within a page.
#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
pub struct CommentEdge {
    pub cursor: String,
    pub node: Comment,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Relay-style paginated comment result.
#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
pub struct CommentConnection {
    pub edges: Vec<CommentEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize, InputObject)]
pub struct CreateCommentInput {
    pub post_id: i64,
    pub parent_comment_id: Option<i64>,
    pub body: String,
}

#[derive(Debug, Deserialize, InputObject)]
pub struct UpdateCommentInput {
    pub id: i64,
    pub body: String,
}
