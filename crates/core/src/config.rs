use serde::Deserialize;

use crate::AppError;

/// Global application settings loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// JSON-RPC endpoint used for read-only contract calls and transaction submission.
    pub rpc_url: String,

    /// Address of the deployed meme token factory contract (`0x`-prefixed hex).
    pub factory_address: String,

    /// Hex private key of the local signing wallet. `None` means no wallet is available.
    pub wallet_private_key: Option<String>,

    /// Base URL of the token indexing API (holders / transfers).
    pub indexer_url: String,

    /// API key sent to the indexing API.
    pub indexer_api_key: String,

    /// Chain name understood by the indexing API.
    pub indexer_chain: String,

    /// Block explorer prefix for transaction links.
    pub explorer_tx_url: String,

    /// Port for the API server.
    pub api_port: u16,

    /// Quiet period before a changed amount is re-quoted.
    pub quote_debounce_ms: u64,

    /// Token amount a purchase form starts with (and is reset to after a purchase).
    pub default_purchase_amount: String,
}

impl Settings {
    /// Load settings from environment variables (with optional `.env` file).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let factory_address = lookup("TOKEN_FACTORY_CONTRACT")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Config("TOKEN_FACTORY_CONTRACT is not defined".into()))?;
        if !is_hex_address(factory_address.trim()) {
            return Err(AppError::Config(format!(
                "TOKEN_FACTORY_CONTRACT is not a valid address: {factory_address}"
            )));
        }

        Ok(Self {
            rpc_url: var("RPC_URL", "https://rpc.sepolia.org"),
            factory_address: factory_address.trim().to_string(),
            wallet_private_key: lookup("WALLET_PRIVATE_KEY").filter(|v| !v.trim().is_empty()),
            indexer_url: var("INDEXER_URL", "https://deep-index.moralis.io/api/v2.2"),
            indexer_api_key: var("INDEXER_API_KEY", ""),
            indexer_chain: var("INDEXER_CHAIN", "sepolia"),
            explorer_tx_url: var("EXPLORER_TX_URL", "https://sepolia.etherscan.io/tx/"),
            api_port: parse_var("API_PORT", &var("API_PORT", "3000"))?,
            quote_debounce_ms: parse_var("QUOTE_DEBOUNCE_MS", &var("QUOTE_DEBOUNCE_MS", "300"))?,
            default_purchase_amount: var("DEFAULT_PURCHASE_AMOUNT", "200"),
        })
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet_private_key.is_some()
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key}={raw:?}: {e}")))
}

fn is_hex_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
