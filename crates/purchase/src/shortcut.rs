use alloy::primitives::U256;

use crate::{error::PricingError, quote::QuoteEngine, source::PricingSource};

/// A fixed base-currency amount offered as a one-click purchase size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub label: &'static str,
    /// Value in the smallest unit.
    pub value_wei: u128,
}

impl Shortcut {
    pub const fn new(label: &'static str, value_wei: u128) -> Self {
        Self { label, value_wei }
    }

    pub fn value(&self) -> U256 {
        U256::from(self.value_wei)
    }
}

/// Shortcuts offered on every purchase form, in display order.
pub const PREDEFINED_SHORTCUTS: [Shortcut; 3] = [
    Shortcut::new("0.003 ETH", 3_000_000_000_000_000),
    Shortcut::new("0.03 ETH", 30_000_000_000_000_000),
    Shortcut::new("0.3 ETH", 300_000_000_000_000_000),
];

/// Chooses the token amount for a purchase, either typed or via a shortcut.
pub struct AmountSelector<P> {
    engine: QuoteEngine<P>,
    shortcuts: &'static [Shortcut],
}

impl<P> Clone for AmountSelector<P> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            shortcuts: self.shortcuts,
        }
    }
}

impl<P: PricingSource> AmountSelector<P> {
    pub fn new(engine: QuoteEngine<P>) -> Self {
        Self::with_shortcuts(engine, &PREDEFINED_SHORTCUTS)
    }

    pub fn with_shortcuts(engine: QuoteEngine<P>, shortcuts: &'static [Shortcut]) -> Self {
        Self { engine, shortcuts }
    }

    pub fn shortcuts(&self) -> &'static [Shortcut] {
        self.shortcuts
    }

    pub fn shortcut(&self, index: usize) -> Option<Shortcut> {
        self.shortcuts.get(index).copied()
    }

    /// Convert a shortcut's currency amount into a token amount.
    pub async fn select_shortcut(
        &self,
        shortcut: Shortcut,
        total_supply: U256,
    ) -> Result<String, PricingError> {
        let amount = self
            .engine
            .token_amount_for(shortcut.value(), total_supply)
            .await?;
        tracing::debug!(shortcut = shortcut.label, %amount, "Shortcut converted");
        Ok(amount.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::tests::MockPricing;
    use crate::units::{parse_base_units, parse_token_amount};
    use std::sync::Arc;

    #[test]
    fn test_shortcut_values_match_labels() {
        for shortcut in PREDEFINED_SHORTCUTS {
            let label_value = shortcut.label.trim_end_matches(" ETH");
            assert_eq!(parse_base_units(label_value).unwrap(), shortcut.value());
        }
    }

    #[tokio::test]
    async fn test_select_shortcut_uses_inverse_query() {
        let pricing = Arc::new(MockPricing::new(0, 2000));
        let selector = AmountSelector::new(QuoteEngine::new(Arc::clone(&pricing)));
        let shortcut = selector.shortcut(1).unwrap();

        let amount = selector
            .select_shortcut(shortcut, U256::from(200_000))
            .await
            .unwrap();

        assert_eq!(amount, "2000");
        assert_eq!(
            pricing.inverse_calls(),
            vec![(U256::from(200_000), U256::from(30_000_000_000_000_000u128))]
        );
        assert!(pricing.cost_calls().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_within_tolerance() {
        // Linear curve stand-in: 1 token = 1.7e13 wei, integer division both ways.
        let pricing = Arc::new(MockPricing::new(0, 0));
        let shortcut = PREDEFINED_SHORTCUTS[0];
        let tokens = shortcut.value() / U256::from(17_000_000_000_000u64);
        *pricing.token_amount.lock().unwrap() = Ok(tokens);
        *pricing.cost.lock().unwrap() = Ok(tokens * U256::from(17_000_000_000_000u64));
        let engine = QuoteEngine::new(Arc::clone(&pricing));
        let selector = AmountSelector::new(engine.clone());

        let amount = selector
            .select_shortcut(shortcut, U256::from(200_000))
            .await
            .unwrap();
        let quote = engine
            .quote(parse_token_amount(&amount).unwrap(), U256::from(200_000))
            .await
            .unwrap();

        let (value, cost) = (shortcut.value(), quote.cost_wei);
        let diff = if value > cost { value - cost } else { cost - value };
        assert!(!diff.is_zero());
        assert!(diff < U256::from(17_000_000_000_000u64));
    }

    #[test]
    fn test_out_of_range_shortcut() {
        let selector = AmountSelector::new(QuoteEngine::new(Arc::new(MockPricing::new(0, 0))));
        assert!(selector.shortcut(PREDEFINED_SHORTCUTS.len()).is_none());
    }
}
