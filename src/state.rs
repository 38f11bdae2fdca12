use std::sync::Arc;

use crate::auth::SessionStore;
use crate::completion::CompletionProvider;
use crate::config::AppConfig;
use crate::messaging::ChatLocks;
use crate::store::Store;

/// Everything a request handler needs; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub sessions: SessionStore,
    pub completion: Arc<dyn CompletionProvider>,
    pub chat_locks: ChatLocks,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store, completion: Arc<dyn CompletionProvider>) -> Self {
        let sessions = SessionStore::with_ttl(config.session_ttl);
        Self {
            config: Arc::new(config),
            store,
            sessions,
            completion,
            chat_locks: ChatLocks::new(),
        }
    }
}
