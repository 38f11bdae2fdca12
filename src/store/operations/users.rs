use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;

use crate::store::{
    error::Result,
    types::User,
};

const USER_COLUMNS: &str = "id, email, username, password_hash, created_at";

/// Insert a user and return the stored row
///
/// # Errors
///
/// * `StoreError::UniqueViolation` - email or username already taken
/// * `StoreError::Database` - any other SQL failure
pub async fn insert_user(
    pool: &Pool,
    email: &str,
    username: &str,
    password_hash: &str,
    created_at: DateTime<Utc>,
) -> Result<User> {
    let conn = pool.get().await?;
    let sql = format!(
        "INSERT INTO users (email, username, password_hash, created_at) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        USER_COLUMNS
    );

    let row = conn
        .query_one(&sql, &[&email, &username, &password_hash, &created_at])
        .await?;
    User::try_from(&row)
}

/// Look a user up by primary key
pub async fn find_user_by_id(pool: &Pool, id: i64) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

    conn.query_opt(&sql, &[&id])
        .await?
        .as_ref()
        .map(User::try_from)
        .transpose()
}

/// Look a user up by (already normalized) email
pub async fn find_user_by_email(pool: &Pool, email: &str) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

    conn.query_opt(&sql, &[&email])
        .await?
        .as_ref()
        .map(User::try_from)
        .transpose()
}
