use serde::{Deserialize, Serialize};

// ─── Owner ──────────────────────────────────────────────────────────────────

/// A holder of a token and their share of its supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub owner_address: String,
    pub percentage_relative_to_total_supply: String,
}

// ─── Transfer ───────────────────────────────────────────────────────────────

/// A single token movement as reported by the indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from_address: String,
    pub to_address: String,
    pub value_decimal: String,
    pub transaction_hash: String,
}

impl Transfer {
    pub fn short_from(&self) -> String {
        short_address(&self.from_address)
    }

    pub fn short_to(&self) -> String {
        short_address(&self.to_address)
    }

    /// Link to this transfer on a block explorer whose tx pages live under `explorer_tx_url`.
    pub fn explorer_link(&self, explorer_tx_url: &str) -> String {
        format!("{explorer_tx_url}{}", self.transaction_hash)
    }
}

// ─── Envelope ───────────────────────────────────────────────────────────────

/// Paged list response; a missing `result` is treated as empty.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultPage<T> {
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

/// `0x1234...abcd` form of an address.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            "0xf39F...2266"
        );
        assert_eq!(short_address("0x1234"), "0x1234");
    }

    #[test]
    fn test_owner_page_parses() {
        let body = r#"{
            "cursor": null,
            "page": 0,
            "result": [
                {
                    "owner_address": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                    "balance": "200000000000000000000000",
                    "percentage_relative_to_total_supply": "99.5",
                    "is_contract": false
                }
            ]
        }"#;
        let page: ResultPage<Owner> = serde_json::from_str(body).unwrap();
        assert_eq!(page.result.len(), 1);
        assert_eq!(page.result[0].percentage_relative_to_total_supply, "99.5");
    }

    #[test]
    fn test_missing_result_is_empty() {
        let page: ResultPage<Transfer> = serde_json::from_str(r#"{"message":"oops"}"#).unwrap();
        assert!(page.result.is_empty());
    }

    #[test]
    fn test_transfer_helpers() {
        let transfer = Transfer {
            from_address: "0x0000000000000000000000000000000000000000".into(),
            to_address: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".into(),
            value_decimal: "200".into(),
            transaction_hash: "0xabc".into(),
        };
        assert_eq!(transfer.short_from(), "0x0000...0000");
        assert_eq!(transfer.short_to(), "0x7099...79c8");
        assert_eq!(
            transfer.explorer_link("https://sepolia.etherscan.io/tx/"),
            "https://sepolia.etherscan.io/tx/0xabc"
        );
    }
}
