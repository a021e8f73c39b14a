use alloy::primitives::U256;
use memepad_purchase::units::format_base_units;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::abi::MemeTokenFactory;

/// Creation fee charged by the factory, in the smallest unit (0.0001 ETH).
pub const CREATION_FEE_WEI: u128 = 100_000_000_000_000;

/// Hard cap on any meme token's supply, in whole tokens.
pub const MAX_SUPPLY: u64 = 1_000_000;

/// Tokens minted to the factory when a meme token is created.
pub const INITIAL_MINT: u64 = 200_000;

/// Funding (base currency) at which the curve completes and liquidity is seeded.
pub const FUNDING_TARGET: &str = "24";

// ─── Token ──────────────────────────────────────────────────────────────────

/// A meme token registered with the factory, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemeToken {
    pub name: String,
    pub symbol: String,
    pub description: String,
    /// Empty unless the on-chain value is an http(s) URL.
    pub token_image_url: String,
    /// Base currency raised so far.
    pub funding_raised: String,
    pub token_address: String,
    pub creator_address: String,
}

impl MemeToken {
    pub(crate) fn from_parts(
        name: String,
        symbol: String,
        description: String,
        image_url: String,
        funding_raised: U256,
        token_address: alloy::primitives::Address,
        creator_address: alloy::primitives::Address,
    ) -> Self {
        Self {
            name,
            symbol,
            description,
            token_image_url: if is_http_url(&image_url) {
                image_url
            } else {
                String::new()
            },
            funding_raised: format_base_units(funding_raised),
            token_address: format!("{token_address:#x}"),
            creator_address: format!("{creator_address:#x}"),
        }
    }

    /// Case-insensitive match of `query` against name and symbol.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.symbol.to_lowercase().contains(&query)
    }
}

impl From<MemeTokenFactory::MemeToken> for MemeToken {
    fn from(t: MemeTokenFactory::MemeToken) -> Self {
        Self::from_parts(
            t.name,
            t.symbol,
            t.description,
            t.tokenImageUrl,
            t.fundingRaised,
            t.tokenAddress,
            t.creatorAddress,
        )
    }
}

/// Gallery filter; an empty query keeps everything.
pub fn search(tokens: Vec<MemeToken>, query: &str) -> Vec<MemeToken> {
    tokens.into_iter().filter(|t| t.matches(query)).collect()
}

pub fn is_http_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

// ─── Creation ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateTokenError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("image URL must be an http(s) link")]
    InvalidImageUrl,
}

/// Input for `createMemeToken`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image_url: String,
}

impl CreateTokenRequest {
    pub fn validate(&self) -> Result<(), CreateTokenError> {
        for (field, value) in [
            ("name", &self.name),
            ("symbol", &self.symbol),
            ("description", &self.description),
            ("image URL", &self.image_url),
        ] {
            if value.trim().is_empty() {
                return Err(CreateTokenError::Missing(field));
            }
        }
        if !is_http_url(self.image_url.trim()) {
            return Err(CreateTokenError::InvalidImageUrl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn token(name: &str, symbol: &str) -> MemeToken {
        MemeToken {
            name: name.into(),
            symbol: symbol.into(),
            description: String::new(),
            token_image_url: String::new(),
            funding_raised: "0.0".into(),
            token_address: String::new(),
            creator_address: String::new(),
        }
    }

    #[test]
    fn test_onchain_token_mapping() {
        let raw = MemeTokenFactory::MemeToken {
            name: "Doge Two".into(),
            symbol: "DOGE2".into(),
            description: "much wow".into(),
            tokenImageUrl: "ipfs://bafy".into(),
            fundingRaised: U256::from(2_500_000_000_000_000_000u128),
            tokenAddress: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
            creatorAddress: address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
        };

        let token = MemeToken::from(raw);

        assert_eq!(token.funding_raised, "2.5");
        assert_eq!(token.token_image_url, "");
        assert_eq!(token.token_address, "0x5fbdb2315678afecb367f032d93f642f64180aa3");
    }

    #[test]
    fn test_search_by_name_or_symbol() {
        let tokens = vec![token("Pepe Classic", "PEPE"), token("Wojak", "WJK")];

        assert_eq!(search(tokens.clone(), "").len(), 2);
        assert_eq!(search(tokens.clone(), "pepe")[0].symbol, "PEPE");
        assert_eq!(search(tokens.clone(), "wjk")[0].name, "Wojak");
        assert!(search(tokens, "shib").is_empty());
    }

    #[test]
    fn test_http_url_check() {
        assert!(is_http_url("https://example.com/a.png"));
        assert!(is_http_url("http://example.com"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("not a url"));
    }

    #[test]
    fn test_create_request_validation() {
        let mut request = CreateTokenRequest {
            name: "Pepe".into(),
            symbol: "PEPE".into(),
            description: "frog".into(),
            image_url: "https://example.com/pepe.png".into(),
        };
        assert!(request.validate().is_ok());

        request.symbol = " ".into();
        assert_eq!(request.validate(), Err(CreateTokenError::Missing("symbol")));

        request.symbol = "PEPE".into();
        request.image_url = "data:image/png;base64,AAAA".into();
        assert_eq!(request.validate(), Err(CreateTokenError::InvalidImageUrl));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(token("A", "B")).unwrap();
        assert!(json.get("tokenImageUrl").is_some());
        assert!(json.get("fundingRaised").is_some());
    }
}
