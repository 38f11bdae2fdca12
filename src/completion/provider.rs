//! Provider trait for completion backends

use async_trait::async_trait;

use super::{error::CompletionError, types::CompletionRequest};

/// Anything that can turn a conversation into an assistant reply
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one non-streaming completion and return the reply text
    ///
    /// Implementations make a single attempt; there is no retry.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
