use deadpool_postgres::Pool;

use crate::store::error::Result;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)"#;

const CREATE_CHATS: &str = r#"
CREATE TABLE IF NOT EXISTS chats (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    model TEXT NOT NULL,
    system_prompt TEXT,
    temperature DOUBLE PRECISION NOT NULL DEFAULT 0.7,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)"#;

const CREATE_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id BIGSERIAL PRIMARY KEY,
    chat_id BIGINT NOT NULL REFERENCES chats(id) ON DELETE CASCADE,
    role TEXT NOT NULL CHECK (role IN ('system', 'user', 'assistant')),
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)"#;

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_chats_user_updated ON chats(user_id, updated_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_messages_chat ON messages(chat_id, id)",
];

/// Create tables and indexes if they do not exist yet
///
/// Safe to run on every startup. Statements run one at a time since a
/// prepared statement may only hold one command.
pub async fn init_schema(pool: &Pool) -> Result<()> {
    let conn = pool.get().await?;

    for statement in [CREATE_USERS, CREATE_CHATS, CREATE_MESSAGES]
        .into_iter()
        .chain(CREATE_INDEXES)
    {
        conn.execute(statement, &[]).await?;
    }

    Ok(())
}
