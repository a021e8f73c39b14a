use std::sync::Arc;

use alloy::primitives::{Address, TxHash};

use crate::{
    error::{ErrorKind, PurchaseError},
    quote::CostQuote,
    source::Wallet,
};

/// Where the front-end should go once a submission finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
}

/// A confirmed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub tx_hash: TxHash,
    pub account: Address,
    pub next_view: View,
}

pub type SubmissionResult = Result<Purchase, PurchaseError>;

/// Authorises, submits and confirms a purchase through an injected wallet.
pub struct PurchaseSubmitter<W> {
    wallet: Option<Arc<W>>,
}

impl<W: Wallet> PurchaseSubmitter<W> {
    pub fn new(wallet: Option<Arc<W>>) -> Self {
        Self { wallet }
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    /// Buy `quote.amount` tokens of `token`, attaching `quote.cost_wei`.
    ///
    /// Every failure is classified and returned; nothing is retried.
    pub async fn submit(&self, token: Address, quote: &CostQuote) -> SubmissionResult {
        let result = self.run(token, quote).await;
        if let Err(err) = &result {
            tracing::warn!(
                kind = %err.kind,
                detail = %err.detail,
                %token,
                "Purchase failed"
            );
        }
        result
    }

    async fn run(&self, token: Address, quote: &CostQuote) -> SubmissionResult {
        let wallet = self.wallet.as_ref().ok_or_else(PurchaseError::no_wallet)?;

        let accounts = wallet.request_accounts().await?;
        let account = *accounts.first().ok_or_else(|| {
            PurchaseError::new(ErrorKind::UserRejected, "wallet authorised no accounts")
        })?;
        tracing::info!(%account, "Wallet authorised");

        let pending = wallet
            .send_purchase(token, quote.amount, quote.cost_wei)
            .await?;
        tracing::info!(
            tx = %pending,
            amount = %quote.amount,
            cost = %quote.cost,
            "Purchase submitted, awaiting confirmation"
        );

        let tx_hash = wallet.wait_for_confirmation(pending).await?;
        tracing::info!(tx = %tx_hash, "Purchase confirmed");

        Ok(Purchase {
            tx_hash,
            account,
            next_view: View::Landing,
        })
    }
}
