use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;

use crate::store::{
    error::Result,
    types::{Chat, ChatConfigUpdate, NewChat},
};

const CHAT_COLUMNS: &str =
    "id, user_id, title, model, system_prompt, temperature, created_at, updated_at";

/// All chats of a user, most recently active first
pub async fn list_chats(pool: &Pool, user_id: i64) -> Result<Vec<Chat>> {
    let conn = pool.get().await?;
    let sql = format!(
        "SELECT {} FROM chats WHERE user_id = $1 ORDER BY updated_at DESC, id DESC",
        CHAT_COLUMNS
    );

    conn.query(&sql, &[&user_id])
        .await?
        .iter()
        .map(Chat::try_from)
        .collect()
}

/// Insert a chat; both timestamps are set to `now`
pub async fn insert_chat(
    pool: &Pool,
    user_id: i64,
    chat: &NewChat,
    now: DateTime<Utc>,
) -> Result<Chat> {
    let conn = pool.get().await?;
    let sql = format!(
        "INSERT INTO chats (user_id, title, model, system_prompt, temperature, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {}",
        CHAT_COLUMNS
    );

    let row = conn
        .query_one(
            &sql,
            &[
                &user_id,
                &chat.title,
                &chat.model,
                &chat.system_prompt,
                &chat.temperature,
                &now,
            ],
        )
        .await?;
    Chat::try_from(&row)
}

/// Fetch a chat only if `user_id` owns it
pub async fn find_chat(pool: &Pool, chat_id: i64, user_id: i64) -> Result<Option<Chat>> {
    let conn = pool.get().await?;
    let sql = format!(
        "SELECT {} FROM chats WHERE id = $1 AND user_id = $2",
        CHAT_COLUMNS
    );

    conn.query_opt(&sql, &[&chat_id, &user_id])
        .await?
        .as_ref()
        .map(Chat::try_from)
        .transpose()
}

/// Write the provided configuration fields of an owned chat
///
/// Returns `false` when the chat does not exist or belongs to someone else.
/// Omitted fields keep their stored value; `updated_at` is not touched.
pub async fn update_chat_config(
    pool: &Pool,
    chat_id: i64,
    user_id: i64,
    update: &ChatConfigUpdate,
) -> Result<bool> {
    let conn = pool.get().await?;
    let updated = conn
        .execute(
            "UPDATE chats SET \
                model = COALESCE($3, model), \
                system_prompt = COALESCE($4, system_prompt), \
                temperature = COALESCE($5, temperature) \
             WHERE id = $1 AND user_id = $2",
            &[
                &chat_id,
                &user_id,
                &update.model,
                &update.system_prompt,
                &update.temperature,
            ],
        )
        .await?;

    Ok(updated > 0)
}

/// Delete an owned chat and its messages in one transaction
///
/// Messages are deleted explicitly rather than relying on the cascade.
/// Returns `false` when the chat does not exist or belongs to someone else.
pub async fn delete_chat(pool: &Pool, chat_id: i64, user_id: i64) -> Result<bool> {
    let mut conn = pool.get().await?;
    let txn = conn.transaction().await?;

    let owned = txn
        .query_opt(
            "SELECT id FROM chats WHERE id = $1 AND user_id = $2 FOR UPDATE",
            &[&chat_id, &user_id],
        )
        .await?;
    if owned.is_none() {
        txn.rollback().await?;
        return Ok(false);
    }

    txn.execute("DELETE FROM messages WHERE chat_id = $1", &[&chat_id])
        .await?;
    txn.execute("DELETE FROM chats WHERE id = $1", &[&chat_id])
        .await?;
    txn.commit().await?;

    Ok(true)
}
