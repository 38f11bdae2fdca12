use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use routerchat::completion::OpenRouterClient;
use routerchat::config::AppConfig;
use routerchat::routes::configure_routes;
use routerchat::state::AppState;
use routerchat::store::{Store, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    if config.completion.api_key.is_empty() {
        tracing::warn!("OPENROUTER_API_KEY is not set; completions will fail upstream");
    }

    let store_config = StoreConfig::from_connection_string(&config.database_url)?
        .with_max_pool_size(config.db_pool_size);
    let store = Store::connect(store_config)
        .await
        .context("connecting to the database")?;
    store.init_schema().await.context("creating the schema")?;
    tracing::info!("Database connected and schema ready.");

    let completion = OpenRouterClient::new(config.completion.clone())?;
    let bind_addr = config.bind_addr;
    let state = AppState::new(config, store, Arc::new(completion));

    tracing::info!("Starting server on http://{}", bind_addr);
    warp::serve(configure_routes(state)).run(bind_addr).await;

    Ok(())
}
