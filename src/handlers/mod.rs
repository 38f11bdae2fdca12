// Handlers module

pub mod api;
pub mod chats;
pub mod pages;
pub mod send_message;

pub use api::{me_handler, models_handler};
pub use chats::{
    create_chat_handler, delete_chat_handler, get_chat_handler, list_chats_handler,
    update_chat_config_handler,
};
pub use pages::{
    chat_page_handler, index_handler, login_handler, login_page_handler, logout_handler,
    signup_handler, signup_page_handler,
};
pub use send_message::send_message_handler;
