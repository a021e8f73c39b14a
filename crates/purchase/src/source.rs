//! Capabilities the purchase workflow is handed explicitly instead of
//! reaching for a global provider.

use std::future::Future;

use alloy::primitives::{Address, TxHash, U256};

use crate::error::{PricingError, WalletError};

/// Read-only access to the bonding-curve pricing functions.
pub trait PricingSource {
    /// Cost, in the smallest unit, of buying `amount` tokens at `total_supply`.
    fn calculate_cost(
        &self,
        total_supply: U256,
        amount: U256,
    ) -> impl Future<Output = Result<U256, PricingError>> + Send;

    /// Number of tokens `value` (smallest unit) buys at `total_supply`.
    fn calculate_token_amount(
        &self,
        total_supply: U256,
        value: U256,
    ) -> impl Future<Output = Result<U256, PricingError>> + Send;
}

/// A wallet able to authorise and submit purchase transactions.
pub trait Wallet {
    /// Ask the wallet for its authorised accounts. May wait on user approval.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send;

    /// Submit `buyMemeToken(token, amount)` carrying `value`; returns the pending hash.
    fn send_purchase(
        &self,
        token: Address,
        amount: U256,
        value: U256,
    ) -> impl Future<Output = Result<TxHash, WalletError>> + Send;

    /// Wait until the transaction is included and return its confirmed hash.
    fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = Result<TxHash, WalletError>> + Send;
}
