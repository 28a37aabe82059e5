use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;
use crate::models::CommentConnection;
use crate::pagination::{CommentPageArgs, CommentPager};
use crate::repository::Repos;

use async_graphql::ErrorExtensions;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, SimpleObject)]
#[graphql(complex)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub allow_comments: bool,
    pub created_at: DateTime<Utc>,
}

#[ComplexObject]
impl Post {
    /// Paginated comments for this post, Relay-style.
    async fn comments(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        last: Option<i32>,
        after: Option<String>,
        before: Option<String>,
    ) -> Result<CommentConnection> {
        let repos = ctx.data::<Repos>()?;
        let pager = CommentPager::new(&repos.comments);
        pager
            .fetch_comment_page(CommentPageArgs {
                post_id: self.id,
                first,
                last,
                after,
                before,
            })
            .await
            .map_err(|e| ApiError::from(e).extend())
    }
}

#[derive(Debug, Deserialize, InputObject)]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    pub allow_comments: bool,
}

#[derive(Debug, Deserialize, InputObject)]
pub struct UpdatePostInput {
    pub id: i64,
    pub title: Option<String>,
    pub body: Option<String>,
    pub allow_comments: Option<bool>,
}
