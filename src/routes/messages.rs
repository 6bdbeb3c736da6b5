use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{MessageInput, MessageRepository, UserRepository},
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Conversation list: one entry per contact, carrying the latest message
/// exchanged with them, most recent first.
#[get("")]
pub async fn conversations(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let messages = MessageRepository::new(pool.get_ref().clone());
    let items = messages.conversations(user.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Unread badge value for the authenticated user.
#[get("/unread")]
pub async fn unread(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let messages = MessageRepository::new(pool.get_ref().clone());
    let count = messages.unread_count(user.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "unread": count })))
}

/// Candidates for a new conversation: every account except the caller's.
#[get("/contacts")]
pub async fn contacts(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let users = UserRepository::new(pool.get_ref().clone())
        .all_except(user.id)
        .await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Opens the thread with another user.
///
/// Messages from that user are marked read as a side effect (repeating the
/// call changes nothing further), then the full exchange is returned in
/// chronological order.
///
/// ## Responses:
/// - `200 OK`: `{ "contact": ..., "messages": [...] }`.
/// - `400 Bad Request`: the path id is the caller's own.
/// - `404 Not Found`: no such user.
#[get("/{user_id}")]
pub async fn thread(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    other_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let other_id = other_id.into_inner();
    if other_id == user.id {
        return Err(AppError::BadRequest(
            "Cannot open a conversation with yourself".into(),
        ));
    }

    let contact = UserRepository::new(pool.get_ref().clone())
        .find_by_id(other_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let messages = MessageRepository::new(pool.get_ref().clone());
    messages.mark_read(user.id, other_id).await?;
    let items = messages.between(user.id, other_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "contact": contact,
        "messages": items,
    })))
}

/// Sends a direct message to another user.
///
/// ## Responses:
/// - `201 Created`: the stored message.
/// - `400 Bad Request`: addressed to self.
/// - `404 Not Found`: no such receiver.
/// - `422 Unprocessable Entity`: empty content.
#[post("/{user_id}")]
pub async fn send(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    receiver_id: web::Path<i32>,
    input: web::Json<MessageInput>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let content = input.content.trim();
    if content.is_empty() {
        return Err(AppError::ValidationError(
            "Message content must not be empty".into(),
        ));
    }

    let receiver_id = receiver_id.into_inner();
    if receiver_id == user.id {
        return Err(AppError::BadRequest(
            "Cannot send a message to yourself".into(),
        ));
    }

    let users = UserRepository::new(pool.get_ref().clone());
    if users.find_by_id(receiver_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".into()));
    }

    let message = MessageRepository::new(pool.get_ref().clone())
        .create(user.id, receiver_id, content)
        .await?;

    Ok(HttpResponse::Created().json(message))
}

/// Deletes the whole conversation with a contact, both directions. Removing
/// an exchange that does not exist is a no-op, not an error.
#[delete("/{user_id}")]
pub async fn remove(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    contact_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let messages = MessageRepository::new(pool.get_ref().clone());
    messages
        .delete_conversation(user.id, contact_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
