// HTTP server modules
pub mod handlers;
pub mod models;
pub mod pages;
pub mod routes;
pub mod state;

// Accounts, chats and chat turns
pub mod auth;
pub mod chats;
pub mod error;
pub mod messaging;

// Process configuration
pub mod config;

// PostgreSQL store
pub mod store;

// Completion API client
pub mod completion;
