use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::error::{ApiError, ApiResult, StorageError};
use crate::models::{Comment, CreateCommentInput, MAX_COMMENT_BODY_LEN, UpdateCommentInput};
use crate::pagination::{CommentRangeQuery, CommentStore, OrderDirection};

#[derive(Clone)]
pub struct CommentRepository {
    pool: MySqlPool,
}

impl CommentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create_comment(&self, author_id: i64, input: &CreateCommentInput) -> ApiResult<Comment> {
        let body = validate_body(&input.body)?;

        let allow = sqlx::query_as::<_, (bool,)>("SELECT allow_comments FROM posts WHERE id = ?")
            .bind(input.post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        check_post_allows_comments(allow.map(|(a,)| a))?;

        if let Some(parent_id) = input.parent_comment_id {
            let parent = sqlx::query_as::<_, (i64,)>("SELECT post_id FROM comments WHERE id = ?")
                .bind(parent_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::from)?;
            check_parent_post(parent.map(|(p,)| p), input.post_id)?;
        }

        let result = sqlx::query(
            "INSERT INTO comments (post_id, author_id, parent_comment_id, body, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(input.post_id)
        .bind(author_id)
        .bind(input.parent_comment_id)
        .bind(body)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        self.comment_by_id(result.last_insert_id() as i64).await
    }

    pub async fn comment_by_id(&self, id: i64) -> ApiResult<Comment> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?
            .ok_or_else(|| ApiError::NotFound("comment not found".to_string()))
    }

    pub async fn update_comment(&self, author_id: i64, input: &UpdateCommentInput) -> ApiResult<Comment> {
        let body = validate_body(&input.body)?;

        let result = sqlx::query("UPDATE comments SET body = ? WHERE id = ? AND author_id = ?")
            .bind(body)
            .bind(input.id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        check_author_scoped(result.rows_affected())?;
        self.comment_by_id(input.id).await
    }

    pub async fn delete_comment(&self, author_id: i64, comment_id: i64) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ? AND author_id = ?")
            .bind(comment_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        check_author_scoped(result.rows_affected())
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn fetch_comment_rows(
        &self,
        query: &CommentRangeQuery,
    ) -> Result<Vec<Comment>, StorageError> {
        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(
            "SELECT id, post_id, author_id, parent_comment_id, body, created_at FROM comments WHERE post_id = ",
        );
        builder.push_bind(query.post_id);

        if let Some(after) = query.after {
            builder.push(" AND created_at > ").push_bind(after);
        }
        if let Some(before) = query.before {
            builder.push(" AND created_at < ").push_bind(before);
        }

        builder.push(match query.order {
            OrderDirection::Asc => " ORDER BY created_at ASC",
            OrderDirection::Desc => " ORDER BY created_at DESC",
        });

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows = builder
            .build_query_as::<Comment>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                    StorageError::Unavailable(e.to_string())
                }
                _ => StorageError::Database(e),
            })?;
        Ok(rows)
    }
}

/// Gate on the target post's `allow_comments` flag; `None` means the
/// post row does not exist.
fn check_post_allows_comments(allow: Option<bool>) -> Result<(), ApiError> {
    match allow {
        None => Err(ApiError::NotFound("post not found".to_string())),
        Some(false) => Err(ApiError::Forbidden(
            "comments are disabled for this post".to_string(),
        )),
        Some(true) => Ok(()),
    }
}

/// A parent comment must exist and belong to the same post as the reply.
fn check_parent_post(parent_post_id: Option<i64>, post_id: i64) -> Result<(), ApiError> {
    match parent_post_id {
        None => Err(ApiError::NotFound("parent comment not found".to_string())),
        Some(p) if p != post_id => Err(ApiError::Validation(
            "parent comment belongs to a different post".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

/// Mutations filter on `id AND author_id`; zero affected rows means the
/// comment does not exist or belongs to another author, and both read
/// as not found.
fn check_author_scoped(rows_affected: u64) -> Result<(), ApiError> {
    if rows_affected == 0 {
        return Err(ApiError::NotFound("comment not found".to_string()));
    }
    Ok(())
}

fn validate_body(raw: &str) -> Result<&str, ApiError> {
    let body = raw.trim();
    if body.is_empty() {
        return Err(ApiError::Validation("comment body is required".to_string()));
    }
    if body.chars().count() > MAX_COMMENT_BODY_LEN {
        return Err(ApiError::Validation(format!(
            "comment body exceeds {MAX_COMMENT_BODY_LEN} characters"
        )));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_trimmed_and_bounded() {
        assert_eq!(validate_body("  hello  ").unwrap(), "hello");
        assert!(matches!(
            validate_body("   "),
            Err(ApiError::Validation(_))
        ));
        let long = "x".repeat(MAX_COMMENT_BODY_LEN + 1);
        assert!(matches!(
            validate_body(&long),
            Err(ApiError::Validation(_))
        ));
        let max = "x".repeat(MAX_COMMENT_BODY_LEN);
        assert!(validate_body(&max).is_ok());
    }

    #[test]
    fn parent_from_another_post_is_rejected() {
        assert!(check_parent_post(Some(1), 1).is_ok());
        assert!(matches!(
            check_parent_post(Some(2), 1),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn missing_parent_is_not_found() {
        assert!(matches!(
            check_parent_post(None, 1),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn comments_gate_checks_post_existence_and_flag() {
        assert!(check_post_allows_comments(Some(true)).is_ok());
        assert!(matches!(
            check_post_allows_comments(Some(false)),
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            check_post_allows_comments(None),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn mutation_by_non_author_reads_as_not_found() {
        assert!(check_author_scoped(1).is_ok());
        assert!(matches!(
            check_author_scoped(0),
            Err(ApiError::NotFound(_))
        ));
    }
}
