use memepad_core::AppError;
use serde::de::DeserializeOwned;

use crate::models::{Owner, ResultPage, Transfer};

/// HTTP client for the token indexing API.
#[derive(Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    chain: String,
}

impl IndexerClient {
    pub(crate) fn new(http: reqwest::Client, base_url: &str, api_key: &str, chain: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            chain: chain.to_string(),
        }
    }

    /// Holders of `token`, largest first.
    pub async fn get_owners(&self, token: &str) -> Result<Vec<Owner>, AppError> {
        self.get_page(token, "owners").await
    }

    /// Transfer history of `token`, newest first.
    pub async fn get_transfers(&self, token: &str) -> Result<Vec<Transfer>, AppError> {
        self.get_page(token, "transfers").await
    }

    pub(crate) fn url(&self, token: &str, resource: &str) -> String {
        format!(
            "{}/erc20/{}/{}?chain={}&order=DESC",
            self.base_url, token, resource, self.chain
        )
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        token: &str,
        resource: &str,
    ) -> Result<Vec<T>, AppError> {
        let url = self.url(token, resource);
        tracing::debug!(%url, "Indexer lookup");

        let response = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Indexer(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Indexer(format!("{resource} lookup returned {status}: {body}")));
        }

        let page: ResultPage<T> = response
            .json()
            .await
            .map_err(|e| AppError::Decode(e.to_string()))?;
        Ok(page.result)
    }
}
