//! Accounts, credentials and sessions
//!
//! The session only carries the user id. Every request re-reads the user row,
//! so a session whose user vanished resolves to nobody.

pub mod password;
pub mod session;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::store::{Store, User};

pub use session::{expired_session_cookie, session_cookie, SessionStore, SESSION_COOKIE};

/// The user bound to `token`, if any
pub async fn resolve_current_user(
    store: &Store,
    sessions: &SessionStore,
    token: Option<&str>,
) -> Result<Option<User>, AppError> {
    let Some(user_id) = token.and_then(|t| sessions.user_id(t)) else {
        return Ok(None);
    };

    Ok(store.find_user_by_id(user_id).await?)
}

/// Like [`resolve_current_user`] but fails with `Unauthorized` when nobody resolves
pub async fn require_authenticated(
    store: &Store,
    sessions: &SessionStore,
    token: Option<&str>,
) -> Result<User, AppError> {
    resolve_current_user(store, sessions, token)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Trimmed, lowercased email
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register an account and open a session for it
///
/// Returns the new user and its session token.
pub async fn signup(
    store: &Store,
    sessions: &SessionStore,
    email: &str,
    username: &str,
    password: &str,
) -> Result<(User, String), AppError> {
    let email = normalize_email(email);
    let username = username.trim();
    if email.is_empty() || username.is_empty() || password.is_empty() {
        return Err(AppError::validation("All fields are required."));
    }

    let password_hash = password::hash_password(password).await?;

    let user = match store
        .insert_user(&email, username, &password_hash, Utc::now())
        .await
    {
        Ok(user) => user,
        Err(e) if e.is_unique_violation() => {
            info!("signup rejected, email or username taken");
            return Err(AppError::Duplicate);
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, "user signed up");
    let token = sessions.create(user.id);
    Ok((user, token))
}

/// Check credentials and open a session
///
/// Unknown email and wrong password fail with the same error.
pub async fn login(
    store: &Store,
    sessions: &SessionStore,
    email: &str,
    password: &str,
) -> Result<(User, String), AppError> {
    let email = normalize_email(email);

    let Some(user) = store.find_user_by_email(&email).await? else {
        warn!("login failed");
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify_password(password, &user.password_hash).await {
        warn!(user_id = user.id, "login failed");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = user.id, "user logged in");
    let token = sessions.create(user.id);
    Ok((user, token))
}

/// Forget the session, whether or not it existed
pub fn logout(sessions: &SessionStore, token: Option<&str>) {
    if let Some(token) = token {
        sessions.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn test_logout_without_token() {
        let sessions = SessionStore::new();
        let token = sessions.create(3);
        logout(&sessions, None);
        assert_eq!(sessions.user_id(&token), Some(3));

        logout(&sessions, Some(&token));
        assert_eq!(sessions.user_id(&token), None);
    }
}
