//! Conversions between user-entered strings and on-chain integer amounts.

use alloy::primitives::{
    U256,
    utils::{format_ether, parse_ether},
};

use crate::error::PricingError;

/// Parse a user-entered token quantity.
///
/// Token quantities are whole numbers; anything else (empty, signed,
/// fractional, hex) is not actionable.
pub fn parse_token_amount(input: &str) -> Option<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(trimmed, 10).ok()
}

/// Format an amount in the smallest unit as a base-currency decimal string.
///
/// Trailing zeros are trimmed but at least one fractional digit is kept,
/// so `10^15` renders as `0.001` and `10^18` as `1.0`.
pub fn format_base_units(value: U256) -> String {
    let mut formatted = format_ether(value);
    match formatted.find('.') {
        Some(_) => {
            let trimmed = formatted.trim_end_matches('0').len();
            formatted.truncate(trimmed);
            if formatted.ends_with('.') {
                formatted.push('0');
            }
        }
        None => formatted.push_str(".0"),
    }
    formatted
}

/// Parse a base-currency decimal string into the smallest unit.
pub fn parse_base_units(value: &str) -> Result<U256, PricingError> {
    parse_ether(value.trim()).map_err(|e| PricingError::Unusable(format!("{value:?}: {e}")))
}
