use std::sync::Arc;

use alloy::primitives::U256;

use crate::{
    error::PricingError,
    source::PricingSource,
    units::{format_base_units, parse_token_amount},
};

/// Price of `amount` tokens against one total-supply snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuote {
    pub amount: U256,
    pub total_supply: U256,
    /// Cost in the smallest unit; this is the value attached to the purchase.
    pub cost_wei: U256,
    /// Cost in base currency, for display.
    pub cost: String,
}

impl CostQuote {
    /// A quote is only valid for the exact amount/supply pair it was priced at.
    pub fn is_for(&self, amount: U256, total_supply: U256) -> bool {
        self.amount == amount && self.total_supply == total_supply
    }
}

/// Turns candidate token amounts into cost quotes.
pub struct QuoteEngine<P> {
    pricing: Arc<P>,
}

impl<P> Clone for QuoteEngine<P> {
    fn clone(&self) -> Self {
        Self {
            pricing: Arc::clone(&self.pricing),
        }
    }
}

impl<P: PricingSource> QuoteEngine<P> {
    pub fn new(pricing: Arc<P>) -> Self {
        Self { pricing }
    }

    /// Quote a user-entered amount.
    pub async fn get_cost(&self, amount: &str, total_supply: U256) -> Result<CostQuote, PricingError> {
        let parsed = parse_token_amount(amount)
            .ok_or_else(|| PricingError::Unusable(format!("{amount:?} is not a whole token amount")))?;
        self.quote(parsed, total_supply).await
    }

    pub async fn quote(&self, amount: U256, total_supply: U256) -> Result<CostQuote, PricingError> {
        let cost_wei = self.pricing.calculate_cost(total_supply, amount).await?;
        let cost = format_base_units(cost_wei);
        tracing::debug!(%amount, %total_supply, %cost, "Quote resolved");
        Ok(CostQuote {
            amount,
            total_supply,
            cost_wei,
            cost,
        })
    }

    /// Inverse query: how many tokens `value` buys at `total_supply`.
    pub async fn token_amount_for(&self, value: U256, total_supply: U256) -> Result<U256, PricingError> {
        let amount = self
            .pricing
            .calculate_token_amount(total_supply, value)
            .await?;
        if amount.is_zero() {
            return Err(PricingError::Unusable(format!(
                "{} buys zero tokens",
                format_base_units(value)
            )));
        }
        Ok(amount)
    }
}
