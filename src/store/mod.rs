//! PostgreSQL persistence for users, chats and messages
//!
//! Three tables with cascading foreign keys:
//!
//! * `users` - unique email and username, Argon2 password hash
//! * `chats` - owned by a user, carry model/system prompt/temperature
//! * `messages` - owned by a chat, ordered by their generated id
//!
//! Every chat query is scoped by the owning user id. A unique constraint
//! violation surfaces as [`StoreError::UniqueViolation`] so callers can tell a
//! taken email or username apart from other failures.

pub mod client;
pub mod connection;
pub mod error;
pub mod operations;
pub mod schema;
pub mod types;

pub use client::Store;
pub use connection::StoreConfig;
pub use error::{Result, StoreError};
pub use types::{Chat, ChatConfigUpdate, Message, NewChat, Role, User};
