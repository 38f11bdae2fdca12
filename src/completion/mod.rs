//! Completion API layer
//!
//! A thin, non-streaming client for OpenRouter's chat completions endpoint,
//! behind the [`CompletionProvider`] trait so request handling does not depend
//! on the concrete backend.

pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use client::{CompletionConfig, OpenRouterClient};
pub use error::CompletionError;
pub use provider::CompletionProvider;
pub use types::{ChatMessage, CompletionRequest, CompletionResponse};
