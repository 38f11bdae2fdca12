//! Chat CRUD, always scoped to the calling user

use chrono::Utc;
use tracing::info;

use crate::error::AppError;
use crate::models::{ChatDetail, CreateChatRequest, CreateChatResponse, MessageView, UpdateChatConfigRequest};
use crate::store::{Chat, ChatConfigUpdate, NewChat, Store, User};

pub const DEFAULT_TITLE: &str = "New chat";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Models offered to clients, in display order
pub const AVAILABLE_MODELS: [&str; 4] = [
    "openai/gpt-4o-mini",
    "meta-llama/llama-3.1-70b-instruct:free",
    "mistralai/mistral-large",
    "google/gemini-flash-1.5",
];

/// Apply creation defaults to a request
pub fn new_chat_from(request: CreateChatRequest) -> NewChat {
    let non_blank = |value: Option<String>, default: &str| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    NewChat {
        title: non_blank(request.title, DEFAULT_TITLE),
        model: non_blank(request.model, DEFAULT_MODEL),
        system_prompt: request.system_prompt.unwrap_or_default(),
        temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
    }
}

pub async fn list_chats(store: &Store, user: &User) -> Result<Vec<Chat>, AppError> {
    Ok(store.list_chats(user.id).await?)
}

pub async fn create_chat(
    store: &Store,
    user: &User,
    request: CreateChatRequest,
) -> Result<CreateChatResponse, AppError> {
    let chat = store
        .insert_chat(user.id, &new_chat_from(request), Utc::now())
        .await?;

    info!(user_id = user.id, chat_id = chat.id, model = %chat.model, "chat created");
    Ok(CreateChatResponse {
        id: chat.id,
        title: chat.title,
    })
}

/// A chat owned by `user`, or `NotFound`
pub async fn find_owned_chat(store: &Store, user: &User, chat_id: i64) -> Result<Chat, AppError> {
    store
        .find_chat(chat_id, user.id)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_chat(store: &Store, user: &User, chat_id: i64) -> Result<ChatDetail, AppError> {
    let chat = find_owned_chat(store, user, chat_id).await?;
    let messages = store
        .list_messages(chat.id)
        .await?
        .into_iter()
        .map(MessageView::from)
        .collect();

    Ok(ChatDetail { chat, messages })
}

pub async fn update_chat_config(
    store: &Store,
    user: &User,
    chat_id: i64,
    request: UpdateChatConfigRequest,
) -> Result<(), AppError> {
    let update = ChatConfigUpdate {
        model: request.model,
        system_prompt: request.system_prompt,
        temperature: request.temperature,
    };

    if update.is_empty() {
        // Nothing to write, but ownership still decides between ok and 404
        find_owned_chat(store, user, chat_id).await?;
        return Ok(());
    }

    if !store.update_chat_config(chat_id, user.id, &update).await? {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn delete_chat(store: &Store, user: &User, chat_id: i64) -> Result<(), AppError> {
    if !store.delete_chat(chat_id, user.id).await? {
        return Err(AppError::NotFound);
    }

    info!(user_id = user.id, chat_id, "chat deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_request() {
        let chat = new_chat_from(CreateChatRequest::default());
        assert_eq!(
            chat,
            NewChat {
                title: "New chat".to_string(),
                model: "openai/gpt-4o-mini".to_string(),
                system_prompt: String::new(),
                temperature: 0.7,
            }
        );
    }

    #[test]
    fn test_blank_title_and_model_fall_back() {
        let chat = new_chat_from(CreateChatRequest {
            title: Some("   ".to_string()),
            model: Some(" ".to_string()),
            ..Default::default()
        });
        assert_eq!(chat.title, DEFAULT_TITLE);
        assert_eq!(chat.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_provided_values_are_trimmed_and_kept() {
        let chat = new_chat_from(CreateChatRequest {
            title: Some("  Trip planning ".to_string()),
            model: Some("mistralai/mistral-large ".to_string()),
            system_prompt: Some("You are terse.".to_string()),
            temperature: Some(0.0),
        });
        assert_eq!(chat.title, "Trip planning");
        assert_eq!(chat.model, "mistralai/mistral-large");
        assert_eq!(chat.system_prompt, "You are terse.");
        assert_eq!(chat.temperature, 0.0);
    }

    #[test]
    fn test_default_model_is_offered() {
        assert_eq!(AVAILABLE_MODELS[0], DEFAULT_MODEL);
    }
}
