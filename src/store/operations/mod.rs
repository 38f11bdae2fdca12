pub mod chats;
pub mod messages;
pub mod users;

pub use chats::{delete_chat, find_chat, insert_chat, list_chats, update_chat_config};
pub use messages::{insert_message, list_messages, record_reply};
pub use users::{find_user_by_email, find_user_by_id, insert_user};
