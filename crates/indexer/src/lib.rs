pub mod client;
pub mod models;

pub use client::IndexerClient;
pub use models::{Owner, Transfer};

use std::time::Duration;

use memepad_core::{AppError, Settings};

/// Build an indexer client with production timeouts.
pub fn connect(base_url: &str, api_key: &str, chain: &str) -> Result<IndexerClient, AppError> {
    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(300))
        .build()
        .map_err(|e| AppError::Indexer(e.to_string()))?;
    Ok(IndexerClient::new(http, base_url, api_key, chain))
}

pub fn connect_with(settings: &Settings) -> Result<IndexerClient, AppError> {
    if settings.indexer_api_key.is_empty() {
        tracing::warn!("INDEXER_API_KEY is empty; holder and transfer lookups will likely be refused");
    }
    connect(
        &settings.indexer_url,
        &settings.indexer_api_key,
        &settings.indexer_chain,
    )
}
