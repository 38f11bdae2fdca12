//! One chat turn: store the user message, ask the model, store the reply

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

use crate::chats::{find_owned_chat, DEFAULT_TITLE};
use crate::completion::{ChatMessage, CompletionProvider, CompletionRequest};
use crate::error::AppError;
use crate::models::SendMessageResponse;
use crate::store::{Message, Role, Store, StoreError, User};

/// Prefix of the reply stored when the completion call fails
pub const WARNING_PREFIX: &str = "⚠️ OpenRouter error";

/// Longest auto-derived title, in characters, before the ellipsis
pub const TITLE_MAX_CHARS: usize = 40;

/// Per-chat locks serializing turns within this process
///
/// An entry lives only while some turn holds or waits for it.
#[derive(Clone, Default)]
pub struct ChatLocks {
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl ChatLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `chat_id`
    pub async fn acquire(&self, chat_id: i64) -> ChatTurn {
        let lock = self.locks.entry(chat_id).or_default().clone();
        let guard = lock.lock_owned().await;
        ChatTurn {
            locks: self.clone(),
            chat_id,
            guard: Some(guard),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive hold on one chat; releasing the last one drops the table entry
pub struct ChatTurn {
    locks: ChatLocks,
    chat_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ChatTurn {
    fn drop(&mut self) {
        self.guard.take();
        // The table holds one reference; any other is a waiting turn
        self.locks
            .locks
            .remove_if(&self.chat_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// A write that hit a deleted chat reads as that chat being gone
fn chat_gone(err: StoreError) -> AppError {
    if err.is_foreign_key_violation() {
        AppError::NotFound
    } else {
        err.into()
    }
}

/// Replay of a chat for the completion API
///
/// A non-empty system prompt goes first, then every stored message in order.
pub fn assemble_conversation(system_prompt: &str, history: &[Message]) -> Vec<ChatMessage> {
    let system = (!system_prompt.is_empty()).then(|| ChatMessage::system(system_prompt));

    system
        .into_iter()
        .chain(
            history
                .iter()
                .map(|m| ChatMessage::new(m.role, m.content.clone())),
        )
        .collect()
}

/// First `TITLE_MAX_CHARS` characters of `text`, with "…" if anything was cut
pub fn truncate_title(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// Title after a turn: only the placeholder title is replaced
pub fn derive_title(current: &str, conversation: &[ChatMessage]) -> String {
    if current != DEFAULT_TITLE {
        return current.to_string();
    }

    conversation
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| truncate_title(&m.content))
        .unwrap_or_else(|| current.to_string())
}

/// Run one turn of `chat_id` for `user`
///
/// Upstream failures never fail the call: the warning text is stored and
/// returned as the reply instead.
pub async fn send_message(
    store: &Store,
    completion: &dyn CompletionProvider,
    locks: &ChatLocks,
    user: &User,
    chat_id: i64,
    content: &str,
) -> Result<SendMessageResponse, AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::validation("content required"));
    }

    let _turn = locks.acquire(chat_id).await;
    let chat = find_owned_chat(store, user, chat_id).await?;

    store
        .insert_message(chat.id, Role::User, content, Utc::now())
        .await
        .map_err(chat_gone)?;

    let history = store.list_messages(chat.id).await?;
    let conversation = assemble_conversation(&chat.system_prompt, &history);

    let request = CompletionRequest {
        model: chat.model.clone(),
        temperature: chat.temperature,
        messages: conversation,
    };

    let reply = match completion.complete(&request).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(chat_id = chat.id, model = %chat.model, error = %e, "completion failed");
            format!("{}: {}", WARNING_PREFIX, e)
        }
    };

    let title = derive_title(&chat.title, &request.messages);
    store
        .record_reply(chat.id, &reply, &title, Utc::now())
        .await
        .map_err(chat_gone)?;

    info!(chat_id = chat.id, messages = request.messages.len() + 1, "turn recorded");
    Ok(SendMessageResponse { reply, title })
}
