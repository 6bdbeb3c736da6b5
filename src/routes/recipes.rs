use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{CommentInput, CommentRepository, RecipeInput, RecipeRepository},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Optional search term, matched against titles and ingredients.
    pub q: Option<String>,
}

/// Checked copies of the flattened text fields. Title, ingredients and steps
/// must survive trimming; this mirrors the minimal rules of the publishing
/// form.
struct CheckedRecipeInput {
    title: String,
    description: Option<String>,
    ingredients: String,
    steps: String,
}

fn check_input(input: &RecipeInput) -> Result<CheckedRecipeInput, AppError> {
    input.validate()?;

    let title = input.title.trim().to_string();
    let ingredients = RecipeInput::flatten(&input.ingredients);
    let steps = RecipeInput::flatten(&input.steps);

    if title.is_empty() || ingredients.is_empty() || steps.is_empty() {
        return Err(AppError::ValidationError(
            "Title, ingredients and steps are required".into(),
        ));
    }

    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(CheckedRecipeInput {
        title,
        description,
        ingredients,
        steps,
    })
}

/// Public recipe catalogue.
///
/// Returns every recipe with its author's display name, newest first. With
/// `?q=` the catalogue is filtered by a case-insensitive match on title or
/// ingredients.
///
/// ## Responses:
/// - `200 OK`: JSON array of recipes.
/// - `500 Internal Server Error`: database failure.
#[get("")]
pub async fn list(
    pool: web::Data<PgPool>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let recipes = RecipeRepository::new(pool.get_ref().clone());

    let items = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => recipes.search(q).await?,
        _ => recipes.public_list().await?,
    };

    Ok(HttpResponse::Ok().json(items))
}

/// The authenticated user's own recipes, with category names resolved.
#[get("/mine")]
pub async fn my_recipes(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let recipes = RecipeRepository::new(pool.get_ref().clone());
    let items = recipes.for_user(user.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Recipe detail with author, category and comments.
///
/// ## Responses:
/// - `200 OK`: `{ "recipe": ..., "comments": [...] }`.
/// - `404 Not Found`: no such recipe.
#[get("/{id}")]
pub async fn show(
    pool: web::Data<PgPool>,
    recipe_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let id = recipe_id.into_inner();
    let recipes = RecipeRepository::new(pool.get_ref().clone());

    let recipe = recipes
        .detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))?;

    let comments = CommentRepository::new(pool.get_ref().clone())
        .for_recipe(id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "recipe": recipe,
        "comments": comments,
    })))
}

/// Publishes a new recipe owned by the authenticated user.
///
/// Ingredients and steps arrive as lists; blank entries are dropped and the
/// rest stored as newline-joined text.
///
/// ## Responses:
/// - `201 Created`: the stored recipe.
/// - `401 Unauthorized`: no valid token.
/// - `422 Unprocessable Entity`: missing title/ingredients/steps or field
///   too long.
#[post("")]
pub async fn create(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    input: web::Json<RecipeInput>,
) -> Result<impl Responder, AppError> {
    let checked = check_input(&input)?;

    let recipes = RecipeRepository::new(pool.get_ref().clone());
    let recipe = recipes
        .create(
            user.id,
            input.category_id,
            &checked.title,
            checked.description.as_deref(),
            &checked.ingredients,
            &checked.steps,
            input.image_path.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(recipe))
}

/// Updates a recipe the authenticated user owns.
///
/// Ownership is part of the update predicate itself: a recipe that exists
/// but belongs to someone else produces the same 404 as one that does not
/// exist.
///
/// ## Responses:
/// - `200 OK`: the updated recipe.
/// - `401 Unauthorized`: no valid token.
/// - `404 Not Found`: missing or not owned.
/// - `422 Unprocessable Entity`: invalid input.
#[put("/{id}")]
pub async fn update(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    recipe_id: web::Path<i32>,
    input: web::Json<RecipeInput>,
) -> Result<impl Responder, AppError> {
    let checked = check_input(&input)?;

    let recipes = RecipeRepository::new(pool.get_ref().clone());
    let updated = recipes
        .update_owned(
            recipe_id.into_inner(),
            user.id,
            input.category_id,
            &checked.title,
            checked.description.as_deref(),
            &checked.ingredients,
            &checked.steps,
            input.image_path.as_deref(),
        )
        .await?;

    match updated {
        Some(recipe) => Ok(HttpResponse::Ok().json(recipe)),
        None => Err(AppError::NotFound("Recipe not found".into())),
    }
}

/// Deletes a recipe the authenticated user owns. Same 404 contract as
/// `update`.
#[delete("/{id}")]
pub async fn remove(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    recipe_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let recipes = RecipeRepository::new(pool.get_ref().clone());
    let deleted = recipes.delete_owned(recipe_id.into_inner(), user.id).await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Recipe not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Adds a comment to an existing recipe.
///
/// ## Responses:
/// - `201 Created`: the stored comment.
/// - `401 Unauthorized`: no valid token.
/// - `404 Not Found`: no such recipe.
/// - `422 Unprocessable Entity`: empty content.
#[post("/{id}/comments")]
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    recipe_id: web::Path<i32>,
    input: web::Json<CommentInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let content = input.content.trim();
    if content.is_empty() {
        return Err(AppError::ValidationError(
            "Comment content must not be empty".into(),
        ));
    }

    let id = recipe_id.into_inner();
    let recipes = RecipeRepository::new(pool.get_ref().clone());
    if !recipes.exists(id).await? {
        return Err(AppError::NotFound("Recipe not found".into()));
    }

    let comment = CommentRepository::new(pool.get_ref().clone())
        .create(id, user.id, content)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}
