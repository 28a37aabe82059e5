use chrono::Utc;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::error::{ApiError, ApiResult, StorageError};
use crate::models::{CreatePostInput, Post, UpdatePostInput};

#[derive(Clone)]
pub struct PostRepository {
    pool: MySqlPool,
}

impl PostRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create_post(&self, author_id: i64, input: &CreatePostInput) -> ApiResult<Post> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("post title is required".to_string()));
        }

        let result = sqlx::query(
            "INSERT INTO posts (author_id, title, body, allow_comments, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(author_id)
        .bind(title)
        .bind(&input.body)
        .bind(input.allow_comments)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        self.post_by_id(result.last_insert_id() as i64).await
    }

    pub async fn post_by_id(&self, id: i64) -> ApiResult<Post> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?
            .ok_or_else(|| ApiError::NotFound("post not found".to_string()))
    }

    pub async fn posts_by_author(&self, author_id: i64) -> ApiResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE author_id = ? ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(posts)
    }

    pub async fn update_post(&self, author_id: i64, input: &UpdatePostInput) -> ApiResult<Post> {
        if input.title.is_none() && input.body.is_none() && input.allow_comments.is_none() {
            return Err(ApiError::Validation("no fields to update".to_string()));
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new("UPDATE posts SET ");
        let mut fields = builder.separated(", ");
        if let Some(ref title) = input.title {
            fields.push("title = ").push_bind_unseparated(title);
        }
        if let Some(ref body) = input.body {
            fields.push("body = ").push_bind_unseparated(body);
        }
        if let Some(allow_comments) = input.allow_comments {
            fields
                .push("allow_comments = ")
                .push_bind_unseparated(allow_comments);
        }
        builder.push(" WHERE id = ").push_bind(input.id);
        builder.push(" AND author_id = ").push_bind(author_id);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("post not found".to_string()));
        }

        self.post_by_id(input.id).await
    }

    pub async fn delete_post(&self, author_id: i64, post_id: i64) -> ApiResult<()> {
        // Comments go with the post via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM posts WHERE id = ? AND author_id = ?")
            .bind(post_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("post not found".to_string()));
        }

        Ok(())
    }
}
