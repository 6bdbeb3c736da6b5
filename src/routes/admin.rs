use crate::{
    auth::AdminUser,
    error::AppError,
    models::{CommentRepository, RecipeRepository, Role, User, UserRepository},
};
use actix_web::{delete, get, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

/// Tallies shown on the moderation dashboard, all derived from the user set
/// and the recipe table at request time.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_admins: usize,
    pub total_active: usize,
    pub total_inactive: usize,
    pub recipe_count: i64,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub users: Vec<User>,
    pub stats: DashboardStats,
}

fn tally(users: &[User], recipe_count: i64) -> DashboardStats {
    let total_admins = users.iter().filter(|u| u.role == Role::Admin).count();
    let total_active = users.iter().filter(|u| u.active).count();
    DashboardStats {
        total_users: users.len(),
        total_admins,
        total_active,
        total_inactive: users.len() - total_active,
        recipe_count,
    }
}

/// Admin payload for editing an account.
#[derive(Debug, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 32))]
    pub name: Option<String>,
    pub role: Role,
    pub active: bool,
}

/// Moderation dashboard: every account plus the derived tallies.
#[get("")]
pub async fn dashboard(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let users = UserRepository::new(pool.get_ref().clone()).all().await?;
    let recipe_count = RecipeRepository::new(pool.get_ref().clone())
        .count()
        .await?;

    let stats = tally(&users, recipe_count);
    Ok(HttpResponse::Ok().json(Dashboard { users, stats }))
}

/// Fetches one account for the edit form.
#[get("/users/{id}")]
pub async fn show_user(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    user_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user = UserRepository::new(pool.get_ref().clone())
        .find_by_id(user_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Updates an account's email, display name, role and active flag.
///
/// ## Responses:
/// - `200 OK`: the updated account.
/// - `403 Forbidden`: caller is not an administrator.
/// - `404 Not Found`: no such account.
/// - `422 Unprocessable Entity`: invalid email or name.
#[put("/users/{id}")]
pub async fn update_user(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    user_id: web::Path<i32>,
    input: web::Json<UserUpdate>,
) -> Result<impl Responder, AppError> {
    input.validate()?;

    let id = user_id.into_inner();
    let users = UserRepository::new(pool.get_ref().clone());
    let affected = users
        .update(
            id,
            &input.email,
            input.name.as_deref(),
            input.role,
            input.active,
        )
        .await?;

    if affected == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    let user = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Deletes an account. Administrators cannot delete themselves.
///
/// ## Responses:
/// - `204 No Content`: account removed (recipes, comments and messages go
///   with it).
/// - `400 Bad Request`: target is the caller's own account.
/// - `404 Not Found`: no such account.
#[delete("/users/{id}")]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    admin: AdminUser,
    user_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let id = user_id.into_inner();

    if id == admin.0.id {
        return Err(AppError::BadRequest(
            "Administrators cannot delete their own account".into(),
        ));
    }

    let affected = UserRepository::new(pool.get_ref().clone()).delete(id).await?;
    if affected == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Every recipe with its author's identity, for moderation.
#[get("/recipes")]
pub async fn recipes(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let items = RecipeRepository::new(pool.get_ref().clone())
        .all_with_author()
        .await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Removes any recipe by id, regardless of owner.
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    recipe_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let affected = RecipeRepository::new(pool.get_ref().clone())
        .delete(recipe_id.into_inner())
        .await?;
    if affected == 0 {
        return Err(AppError::NotFound("Recipe not found".into()));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Removes any comment by id.
#[delete("/comments/{id}")]
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    comment_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let affected = CommentRepository::new(pool.get_ref().clone())
        .delete(comment_id.into_inner())
        .await?;
    if affected == 0 {
        return Err(AppError::NotFound("Comment not found".into()));
    }
    Ok(HttpResponse::NoContent().finish())
}
