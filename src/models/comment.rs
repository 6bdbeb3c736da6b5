use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

#[derive(Debug, Serialize, FromRow)]
pub struct Comment {
    pub id: i32,
    pub recipe_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author's identity, for display under a recipe.
#[derive(Debug, Serialize, FromRow)]
pub struct CommentWithAuthor {
    pub id: i32,
    pub recipe_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub author_email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(length(min = 1, max = 2000, message = "Comment content must not be empty"))]
    pub content: String,
}

#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        recipe_id: i32,
        user_id: i32,
        content: &str,
    ) -> sqlx::Result<Comment> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (recipe_id, user_id, content) VALUES ($1, $2, $3) \
             RETURNING id, recipe_id, user_id, content, created_at",
        )
        .bind(recipe_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    /// All comments on a recipe with author identity, newest first.
    pub async fn for_recipe(&self, recipe_id: i32) -> sqlx::Result<Vec<CommentWithAuthor>> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.recipe_id, c.user_id, c.content, c.created_at, \
                    u.name AS author_name, u.email AS author_email \
             FROM comments c JOIN users u ON c.user_id = u.id \
             WHERE c.recipe_id = $1 \
             ORDER BY c.created_at DESC",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Moderation delete by id.
    pub async fn delete(&self, id: i32) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
