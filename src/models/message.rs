use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

#[derive(Debug, Serialize, FromRow)]
pub struct Message {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Message with the sender's display name, for thread rendering.
#[derive(Debug, Serialize, FromRow)]
pub struct MessageWithSender {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender_name: Option<String>,
}

/// One row per counterpart: the latest message exchanged with that contact.
#[derive(Debug, Serialize, FromRow)]
pub struct Conversation {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub contact_id: i32,
    pub contact_name: Option<String>,
    pub contact_email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MessageInput {
    #[validate(length(min = 1, max = 5000, message = "Message content must not be empty"))]
    pub content: String,
}

/// Data access for the `messages` table. A "conversation" is purely derived:
/// the unread badge and the per-contact listing are computed from the rows,
/// never stored alongside them.
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        sender_id: i32,
        receiver_id: i32,
        content: &str,
    ) -> sqlx::Result<Message> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO messages (sender_id, receiver_id, content) VALUES ($1, $2, $3) \
             RETURNING id, sender_id, receiver_id, content, is_read, created_at",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    /// Latest message per distinct counterpart, most recent conversation
    /// first. MAX(id) picks the newest message within a contact group and
    /// breaks creation-time ties.
    pub async fn conversations(&self, user_id: i32) -> sqlx::Result<Vec<Conversation>> {
        sqlx::query_as::<_, Conversation>(
            "SELECT m.id, m.sender_id, m.receiver_id, m.content, m.is_read, m.created_at, \
                    CASE WHEN m.sender_id = $1 THEN m.receiver_id ELSE m.sender_id END AS contact_id, \
                    u.name AS contact_name, u.email AS contact_email \
             FROM messages m \
             JOIN users u \
               ON u.id = CASE WHEN m.sender_id = $1 THEN m.receiver_id ELSE m.sender_id END \
             WHERE m.id IN ( \
                 SELECT MAX(id) FROM messages \
                 WHERE sender_id = $1 OR receiver_id = $1 \
                 GROUP BY CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END \
             ) \
             ORDER BY m.created_at DESC, m.id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Full thread between two users, both directions, chronological.
    pub async fn between(&self, user_a: i32, user_b: i32) -> sqlx::Result<Vec<MessageWithSender>> {
        sqlx::query_as::<_, MessageWithSender>(
            "SELECT m.id, m.sender_id, m.receiver_id, m.content, m.is_read, m.created_at, \
                    u.name AS sender_name \
             FROM messages m JOIN users u ON m.sender_id = u.id \
             WHERE (m.sender_id = $1 AND m.receiver_id = $2) \
                OR (m.sender_id = $2 AND m.receiver_id = $1) \
             ORDER BY m.created_at ASC, m.id ASC",
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_all(&self.pool)
        .await
    }

    /// Marks messages sent by `other` to `reader` as read. Only unread rows
    /// are touched, so repeating the call affects nothing further.
    pub async fn mark_read(&self, reader: i32, other: i32) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE \
             WHERE receiver_id = $1 AND sender_id = $2 AND is_read = FALSE",
        )
        .bind(reader)
        .bind(other)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Unread badge value, always derived from the rows.
    pub async fn unread_count(&self, user_id: i32) -> sqlx::Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    /// Removes the whole exchange with a contact, both directions.
    pub async fn delete_conversation(&self, user_id: i32, contact_id: i32) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "DELETE FROM messages \
             WHERE (sender_id = $1 AND receiver_id = $2) \
                OR (sender_id = $2 AND receiver_id = $1)",
        )
        .bind(user_id)
        .bind(contact_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_input_rejects_empty_content() {
        let input = MessageInput {
            content: "".to_string(),
        };
        assert!(input.validate().is_err());

        let input = MessageInput {
            content: "See you at the market?".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
