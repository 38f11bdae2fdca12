use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;

use crate::store::{
    error::Result,
    types::{Message, Role},
};

const MESSAGE_COLUMNS: &str = "id, chat_id, role, content, created_at";

/// Append a message to a chat
pub async fn insert_message(
    pool: &Pool,
    chat_id: i64,
    role: Role,
    content: &str,
    created_at: DateTime<Utc>,
) -> Result<Message> {
    let conn = pool.get().await?;
    let sql = format!(
        "INSERT INTO messages (chat_id, role, content, created_at) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        MESSAGE_COLUMNS
    );

    let row = conn
        .query_one(&sql, &[&chat_id, &role.as_str(), &content, &created_at])
        .await?;
    Message::try_from(&row)
}

/// Every message of a chat in insertion order
pub async fn list_messages(pool: &Pool, chat_id: i64) -> Result<Vec<Message>> {
    let conn = pool.get().await?;
    let sql = format!(
        "SELECT {} FROM messages WHERE chat_id = $1 ORDER BY id ASC",
        MESSAGE_COLUMNS
    );

    conn.query(&sql, &[&chat_id])
        .await?
        .iter()
        .map(Message::try_from)
        .collect()
}

/// Store an assistant reply and bump the chat in one transaction
///
/// Sets the chat's `updated_at` to `now` and its title to `title`.
pub async fn record_reply(
    pool: &Pool,
    chat_id: i64,
    content: &str,
    title: &str,
    now: DateTime<Utc>,
) -> Result<Message> {
    let mut conn = pool.get().await?;
    let txn = conn.transaction().await?;

    let sql = format!(
        "INSERT INTO messages (chat_id, role, content, created_at) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        MESSAGE_COLUMNS
    );
    let row = txn
        .query_one(
            &sql,
            &[&chat_id, &Role::Assistant.as_str(), &content, &now],
        )
        .await?;
    let message = Message::try_from(&row)?;

    txn.execute(
        "UPDATE chats SET updated_at = $2, title = $3 WHERE id = $1",
        &[&chat_id, &now, &title],
    )
    .await?;
    txn.commit().await?;

    Ok(message)
}
