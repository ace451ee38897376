// Post repository implementation

use crate::db::repositories::PostStore;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{NewPost, Post};
use async_trait::async_trait;
use tracing::instrument;

/// Repository for post-related database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    /// Create a new PostRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    /// Newest first
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Post>, DatabaseError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, userId, title, body
            FROM posts
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.pool.pool())
        .await?;

        Ok(posts)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, userId, title, body
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(post)
    }

    #[instrument(skip(self, post))]
    async fn create(&self, post: &NewPost) -> Result<Post, DatabaseError> {
        let result = sqlx::query("INSERT INTO posts (userId, title, body) VALUES (?, ?, ?)")
            .bind(post.user_id)
            .bind(&post.title)
            .bind(&post.body)
            .execute(self.pool.pool())
            .await?;

        let id = i64::try_from(result.last_insert_id()).map_err(|_| {
            DatabaseError::QueryFailed("Inserted post id out of range".to_string())
        })?;

        let created = self.find_by_id(id).await?.ok_or_else(|| {
            DatabaseError::NotFound(format!("Post {} vanished after insert", id))
        })?;

        tracing::info!(post_id = id, "Post created");
        Ok(created)
    }

    #[instrument(skip(self, title, body))]
    async fn update(&self, id: i64, title: &str, body: &str) -> Result<Post, DatabaseError> {
        sqlx::query("UPDATE posts SET title = ?, body = ? WHERE id = ?")
            .bind(title)
            .bind(body)
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        // Zero affected rows also means "unchanged" on MySQL; re-read decides
        let updated = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Post not found: {}", id)))?;

        tracing::info!(post_id = id, "Post updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Post not found: {}", id)));
        }

        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }
}
