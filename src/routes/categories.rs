use crate::{error::AppError, models::CategoryRepository};
use actix_web::{get, web, HttpResponse, Responder};
use sqlx::PgPool;

/// Category reference list, alphabetical. Used to populate the publishing
/// form.
#[get("")]
pub async fn list(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let categories = CategoryRepository::new(pool.get_ref().clone()).all().await?;
    Ok(HttpResponse::Ok().json(categories))
}
