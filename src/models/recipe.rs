use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

/// A recipe row as stored.
#[derive(Debug, Serialize, FromRow)]
pub struct Recipe {
    pub id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    /// Newline-joined list, one ingredient per line.
    pub ingredients: String,
    /// Newline-joined list, one step per line.
    pub steps: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public listing row: recipe plus the author's display name.
#[derive(Debug, Serialize, FromRow)]
pub struct RecipeWithAuthor {
    pub id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub steps: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: Option<String>,
}

/// "My recipes" row: recipe plus the resolved category name.
#[derive(Debug, Serialize, FromRow)]
pub struct RecipeWithCategory {
    pub id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub steps: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: Option<String>,
}

/// Full detail row: author identity and category name denormalized in. Also
/// serves the admin moderation list.
#[derive(Debug, Serialize, FromRow)]
pub struct RecipeDetail {
    pub id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub steps: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub author_email: String,
    pub category_name: Option<String>,
}

/// Input for creating or updating a recipe. Ingredients and steps arrive as
/// lists and are flattened to newline-joined text before storage; blank
/// entries are dropped.
#[derive(Debug, Deserialize, Validate)]
pub struct RecipeInput {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub category_id: Option<i32>,
    pub image_path: Option<String>,
}

impl RecipeInput {
    /// Trims every entry, drops blanks, joins the rest with newlines.
    pub fn flatten(parts: &[String]) -> String {
        parts
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

const RECIPE_COLUMNS: &str =
    "r.id, r.user_id, r.category_id, r.title, r.description, r.ingredients, r.steps, \
     r.image_path, r.created_at, r.updated_at";

/// Data access for the `recipes` table.
///
/// Every owner-scoped mutation folds the ownership test into the statement's
/// WHERE clause; a non-owned row and a missing row are indistinguishable to
/// callers.
#[derive(Clone)]
pub struct RecipeRepository {
    pool: PgPool,
}

impl RecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All recipes with their author, newest first.
    pub async fn public_list(&self) -> sqlx::Result<Vec<RecipeWithAuthor>> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS}, u.name AS author_name \
             FROM recipes r JOIN users u ON r.user_id = u.id \
             ORDER BY r.created_at DESC"
        );
        sqlx::query_as::<_, RecipeWithAuthor>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// Case-insensitive search over titles and ingredients.
    pub async fn search(&self, query: &str) -> sqlx::Result<Vec<RecipeWithAuthor>> {
        let like = format!("%{}%", query);
        let sql = format!(
            "SELECT {RECIPE_COLUMNS}, u.name AS author_name \
             FROM recipes r JOIN users u ON r.user_id = u.id \
             WHERE r.title ILIKE $1 OR r.ingredients ILIKE $1 \
             ORDER BY r.created_at DESC"
        );
        sqlx::query_as::<_, RecipeWithAuthor>(&sql)
            .bind(like)
            .fetch_all(&self.pool)
            .await
    }

    /// Recipes owned by a user, with category names, newest first.
    pub async fn for_user(&self, user_id: i32) -> sqlx::Result<Vec<RecipeWithCategory>> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS}, c.name AS category_name \
             FROM recipes r LEFT JOIN categories c ON r.category_id = c.id \
             WHERE r.user_id = $1 \
             ORDER BY r.created_at DESC"
        );
        sqlx::query_as::<_, RecipeWithCategory>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Single recipe with author and category resolved, or None.
    pub async fn detail(&self, id: i32) -> sqlx::Result<Option<RecipeDetail>> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS}, u.name AS author_name, u.email AS author_email, \
                    c.name AS category_name \
             FROM recipes r \
             JOIN users u ON r.user_id = u.id \
             LEFT JOIN categories c ON r.category_id = c.id \
             WHERE r.id = $1"
        );
        sqlx::query_as::<_, RecipeDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Lookup scoped to the owner in a single predicate.
    pub async fn find_owned(&self, id: i32, user_id: i32) -> sqlx::Result<Option<Recipe>> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1 AND r.user_id = $2"
        );
        sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Inserts a recipe and returns the stored row.
    pub async fn create(
        &self,
        user_id: i32,
        category_id: Option<i32>,
        title: &str,
        description: Option<&str>,
        ingredients: &str,
        steps: &str,
        image_path: Option<&str>,
    ) -> sqlx::Result<Recipe> {
        sqlx::query_as::<_, Recipe>(
            "INSERT INTO recipes (user_id, category_id, title, description, ingredients, steps, image_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, user_id, category_id, title, description, ingredients, steps, \
                       image_path, created_at, updated_at",
        )
        .bind(user_id)
        .bind(category_id)
        .bind(title)
        .bind(description)
        .bind(ingredients)
        .bind(steps)
        .bind(image_path)
        .fetch_one(&self.pool)
        .await
    }

    /// Owner-scoped update in a single statement; `None` when the recipe is
    /// missing or belongs to someone else.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_owned(
        &self,
        id: i32,
        user_id: i32,
        category_id: Option<i32>,
        title: &str,
        description: Option<&str>,
        ingredients: &str,
        steps: &str,
        image_path: Option<&str>,
    ) -> sqlx::Result<Option<Recipe>> {
        sqlx::query_as::<_, Recipe>(
            "UPDATE recipes \
             SET category_id = $1, title = $2, description = $3, ingredients = $4, \
                 steps = $5, image_path = $6, updated_at = NOW() \
             WHERE id = $7 AND user_id = $8 \
             RETURNING id, user_id, category_id, title, description, ingredients, steps, \
                       image_path, created_at, updated_at",
        )
        .bind(category_id)
        .bind(title)
        .bind(description)
        .bind(ingredients)
        .bind(steps)
        .bind(image_path)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Owner-scoped delete.
    pub async fn delete_owned(&self, id: i32, user_id: i32) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Moderation delete, no ownership check.
    pub async fn delete(&self, id: i32) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Moderation list: every recipe with its author's identity.
    pub async fn all_with_author(&self) -> sqlx::Result<Vec<RecipeDetail>> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS}, u.name AS author_name, u.email AS author_email, \
                    c.name AS category_name \
             FROM recipes r \
             JOIN users u ON r.user_id = u.id \
             LEFT JOIN categories c ON r.category_id = c.id \
             ORDER BY r.created_at DESC"
        );
        sqlx::query_as::<_, RecipeDetail>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// Cheap existence probe, used before attaching child rows.
    pub async fn exists(&self, id: i32) -> sqlx::Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn count(&self) -> sqlx::Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_trims_and_drops_blanks() {
        let parts = vec![
            "  2 eggs ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "100g flour".to_string(),
        ];
        assert_eq!(RecipeInput::flatten(&parts), "2 eggs\n100g flour");
    }

    #[test]
    fn test_flatten_empty_input() {
        assert_eq!(RecipeInput::flatten(&[]), "");
        assert_eq!(RecipeInput::flatten(&["   ".to_string()]), "");
    }

    #[test]
    fn test_recipe_input_title_max_length() {
        let input = RecipeInput {
            title: "a".repeat(201),
            description: None,
            ingredients: vec!["x".to_string()],
            steps: vec!["y".to_string()],
            category_id: None,
            image_path: None,
        };
        assert!(input.validate().is_err());
    }
}
