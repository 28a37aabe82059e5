//! GraphQL query and mutation roots.

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Result, Schema};

use crate::auth::{self, CurrentUser};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    AuthPayload, Comment, CommentConnection, CreateCommentInput, CreatePostInput, LoginInput,
    Post, RegisterInput, UpdateCommentInput, UpdatePostInput,
};
use crate::pagination::{CommentPageArgs, CommentPager};
use crate::repository::Repos;

pub type BoardSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(repos: Repos, config: Config) -> BoardSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(repos)
        .data(config)
        .finish()
}

/// Current user id from the request context, or an UNAUTHORIZED error.
fn require_user(ctx: &Context<'_>) -> Result<i64> {
    ctx.data_opt::<CurrentUser>()
        .map(|u| u.0)
        .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()).extend())
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// A single post by id.
    async fn post(&self, ctx: &Context<'_>, id: i64) -> Result<Post> {
        let repos = ctx.data::<Repos>()?;
        repos.posts.post_by_id(id).await.map_err(|e| e.extend())
    }

    /// Posts authored by the current user, newest first.
    async fn my_posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let user_id = require_user(ctx)?;
        let repos = ctx.data::<Repos>()?;
        repos
            .posts
            .posts_by_author(user_id)
            .await
            .map_err(|e| e.extend())
    }

    /// A single comment by id.
    async fn comment(&self, ctx: &Context<'_>, id: i64) -> Result<Comment> {
        let repos = ctx.data::<Repos>()?;
        repos
            .comments
            .comment_by_id(id)
            .await
            .map_err(|e| e.extend())
    }

    /// Paginated comments for a post, Relay-style. Forward pagination
    /// with `first`/`after`, backward with `last`/`before`; `first`
    /// wins when both page sizes are supplied.
    async fn comments(
        &self,
        ctx: &Context<'_>,
        post_id: i64,
        first: Option<i32>,
        last: Option<i32>,
        after: Option<String>,
        before: Option<String>,
    ) -> Result<CommentConnection> {
        let repos = ctx.data::<Repos>()?;
        let pager = CommentPager::new(&repos.comments);
        pager
            .fetch_comment_page(CommentPageArgs {
                post_id,
                first,
                last,
                after,
                before,
            })
            .await
            .map_err(|e| ApiError::from(e).extend())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn register(&self, ctx: &Context<'_>, input: RegisterInput) -> Result<AuthPayload> {
        let repos = ctx.data::<Repos>()?;
        let config = ctx.data::<Config>()?;

        let user = repos.users.register(&input).await.map_err(|e| e.extend())?;
        let token = auth::generate_token(user.id, &config.jwt_secret)
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(AuthPayload { token, user })
    }

    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AuthPayload> {
        let repos = ctx.data::<Repos>()?;
        let config = ctx.data::<Config>()?;

        let user = repos.users.login(&input).await.map_err(|e| e.extend())?;
        let token = auth::generate_token(user.id, &config.jwt_secret)
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(AuthPayload { token, user })
    }

    async fn create_post(&self, ctx: &Context<'_>, input: CreatePostInput) -> Result<Post> {
        let user_id = require_user(ctx)?;
        let repos = ctx.data::<Repos>()?;
        repos
            .posts
            .create_post(user_id, &input)
            .await
            .map_err(|e| e.extend())
    }

    async fn update_post(&self, ctx: &Context<'_>, input: UpdatePostInput) -> Result<Post> {
        let user_id = require_user(ctx)?;
        let repos = ctx.data::<Repos>()?;
        repos
            .posts
            .update_post(user_id, &input)
            .await
            .map_err(|e| e.extend())
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let user_id = require_user(ctx)?;
        let repos = ctx.data::<Repos>()?;
        repos
            .posts
            .delete_post(user_id, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(true)
    }

    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        input: CreateCommentInput,
    ) -> Result<Comment> {
        let user_id = require_user(ctx)?;
        let repos = ctx.data::<Repos>()?;
        repos
            .comments
            .create_comment(user_id, &input)
            .await
            .map_err(|e| e.extend())
    }

    async fn update_comment(
        &self,
        ctx: &Context<'_>,
        input: UpdateCommentInput,
    ) -> Result<Comment> {
        let user_id = require_user(ctx)?;
        let repos = ctx.data::<Repos>()?;
        repos
            .comments
            .update_comment(user_id, &input)
            .await
            .map_err(|e| e.extend())
    }

    async fn delete_comment(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let user_id = require_user(ctx)?;
        let repos = ctx.data::<Repos>()?;
        repos
            .comments
            .delete_comment(user_id, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(true)
    }
}
