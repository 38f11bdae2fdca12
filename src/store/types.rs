use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

use crate::store::error::StoreError;

/// A registered account
#[derive(Clone)]
pub struct User {
    pub id: i64,
    /// Lowercased, unique
    pub email: String,
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl TryFrom<&Row> for User {
    type Error = StoreError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A conversation thread owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    /// Backend model identifier, e.g. "openai/gpt-4o-mini"
    pub model: String,
    pub system_prompt: String,
    pub temperature: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Chat {
    type Error = StoreError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        let system_prompt: Option<String> = row.try_get("system_prompt")?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            model: row.try_get("model")?,
            system_prompt: system_prompt.unwrap_or_default(),
            temperature: row.try_get("temperature")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Fields for a chat insert, defaults already applied
#[derive(Debug, Clone, PartialEq)]
pub struct NewChat {
    pub title: String,
    pub model: String,
    pub system_prompt: String,
    pub temperature: f64,
}

/// Partial chat configuration update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatConfigUpdate {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub temperature: Option<f64>,
}

impl ChatConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.system_prompt.is_none() && self.temperature.is_none()
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(StoreError::InvalidRow(format!("unknown role '{}'", other))),
        }
    }
}

/// One stored turn of a chat
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Monotonic; defines conversation order
    pub id: i64,
    pub chat_id: i64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Message {
    type Error = StoreError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        let role: &str = row.try_get("role")?;
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            role: role.parse()?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("assistant".parse::<Role>().unwrap(), Role::Assistant);
        assert!("tool".parse::<Role>().is_err());
        assert!("User".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_debug_hides_password_hash() {
        let user = User {
            id: 7,
            email: "a@example.com".to_string(),
            username: "a".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: Utc::now(),
        };
        let debug = format!("{:?}", user);
        assert!(debug.contains("a@example.com"));
        assert!(!debug.contains("argon2id"));
    }

    #[test]
    fn test_chat_config_update_is_empty() {
        assert!(ChatConfigUpdate::default().is_empty());
        let update = ChatConfigUpdate {
            system_prompt: Some(String::new()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
