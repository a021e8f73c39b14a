//! One purchase form bound to one token, driven on a single task.
//!
//! At most one lookup (quote or shortcut conversion) is pending at a time.
//! It lives inside the session as a boxed future that only makes progress
//! while [`PurchaseSession::next_update`] is awaited, so replacing it, or
//! dropping the session, cancels it outright. Quotes wait out a debounce
//! window first, which coalesces rapid typing into a single call.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use alloy::primitives::{Address, U256};

use crate::{
    error::{ErrorKind, PricingError, PurchaseError},
    form::{PurchaseForm, QuoteTicket, ShortcutApplied, ShortcutTicket},
    quote::{CostQuote, QuoteEngine},
    shortcut::{AmountSelector, Shortcut},
    source::{PricingSource, Wallet},
    submit::{PurchaseSubmitter, SubmissionResult},
};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub token: Address,
    /// Supply snapshot every quote in this session is priced against.
    pub total_supply: U256,
    pub default_amount: String,
    pub debounce: Duration,
}

/// What a completed lookup changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Quoted(CostQuote),
    /// A shortcut overwrote the amount; a quote for it is now pending.
    AmountConverted {
        shortcut: &'static str,
        amount: String,
    },
    Failed(PurchaseError),
    Discarded,
}

/// A transient, dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: Option<ErrorKind>,
}

impl Notification {
    fn failure(err: &PurchaseError) -> Self {
        Self {
            title: "Error".into(),
            message: err.user_message().into(),
            kind: Some(err.kind),
        }
    }

    fn success(message: String) -> Self {
        Self {
            title: "Purchase Successful".into(),
            message,
            kind: None,
        }
    }
}

enum Resolution {
    Quote(QuoteTicket, Result<CostQuote, PricingError>),
    Shortcut(ShortcutTicket, Result<String, PricingError>),
}

type Pending = Pin<Box<dyn Future<Output = Resolution>>>;

pub struct PurchaseSession<P, W> {
    token: Address,
    total_supply: U256,
    debounce: Duration,
    form: PurchaseForm,
    quotes: QuoteEngine<P>,
    selector: AmountSelector<P>,
    submitter: PurchaseSubmitter<W>,
    pending: Option<Pending>,
    notifications: Vec<Notification>,
}

impl<P, W> PurchaseSession<P, W>
where
    P: PricingSource + 'static,
    W: Wallet,
{
    /// Open a session; the default amount is quoted straight away.
    pub fn new(config: SessionConfig, pricing: Arc<P>, wallet: Option<Arc<W>>) -> Self {
        let quotes = QuoteEngine::new(pricing);
        let mut session = Self {
            token: config.token,
            total_supply: config.total_supply,
            debounce: config.debounce,
            form: PurchaseForm::new(config.default_amount),
            selector: AmountSelector::new(quotes.clone()),
            quotes,
            submitter: PurchaseSubmitter::new(wallet),
            pending: None,
            notifications: Vec::new(),
        };
        if let Some(ticket) = session.form.requote() {
            session.schedule_quote(ticket);
        }
        session
    }

    pub fn token(&self) -> Address {
        self.token
    }

    /// Supply snapshot this session prices against.
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn amount(&self) -> &str {
        self.form.amount()
    }

    pub fn cost(&self) -> Option<&CostQuote> {
        self.form.cost()
    }

    pub fn is_loading(&self) -> bool {
        self.form.is_loading()
    }

    pub fn can_submit(&self) -> bool {
        self.form.can_submit()
    }

    pub fn has_wallet(&self) -> bool {
        self.submitter.has_wallet()
    }

    pub fn shortcuts(&self) -> &'static [Shortcut] {
        self.selector.shortcuts()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn dismiss(&mut self, index: usize) -> Option<Notification> {
        (index < self.notifications.len()).then(|| self.notifications.remove(index))
    }

    /// Free-form amount entry. Re-entering the current amount leaves its
    /// quote, or the lookup for it, in place.
    pub fn set_amount(&mut self, input: impl Into<String>) {
        let input = input.into();
        if self.form.is_unchanged(&input) {
            return;
        }
        self.pending = None;
        if let Some(ticket) = self.form.set_amount(input) {
            self.schedule_quote(ticket);
        }
    }

    /// Start converting shortcut `index` into a token amount.
    pub fn select_shortcut(&mut self, index: usize) -> Option<Shortcut> {
        let shortcut = self.selector.shortcut(index)?;
        let ticket = self.form.begin_shortcut(shortcut);
        let selector = self.selector.clone();
        let total_supply = self.total_supply;

        tracing::debug!(shortcut = shortcut.label, "Shortcut selected");
        self.pending = Some(Box::pin(async move {
            let result = selector.select_shortcut(shortcut, total_supply).await;
            Resolution::Shortcut(ticket, result)
        }));
        Some(shortcut)
    }

    /// Drive the pending lookup to completion and apply it.
    ///
    /// Returns `None` when nothing is pending. Cancel-safe: dropping the
    /// returned future leaves the lookup pending.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        let pending = self.pending.as_mut()?;
        let resolution = pending.await;
        self.pending = None;
        Some(self.apply(resolution))
    }

    /// Submit the quoted purchase. `None` when submission is disabled.
    ///
    /// On success the form returns to its default amount; on failure it is
    /// left untouched so the user can retry.
    pub async fn submit(&mut self) -> Option<SubmissionResult> {
        if !self.form.can_submit() {
            return None;
        }
        let quote = self.form.cost()?.clone();

        let result = self.submitter.submit(self.token, &quote).await;
        match &result {
            Ok(purchase) => {
                self.notifications.push(Notification::success(format!(
                    "Transaction hash: {:#x}",
                    purchase.tx_hash
                )));
                self.pending = None;
                if let Some(ticket) = self.form.reset() {
                    self.schedule_quote(ticket);
                }
            }
            Err(err) => self.notifications.push(Notification::failure(err)),
        }
        Some(result)
    }

    fn schedule_quote(&mut self, ticket: QuoteTicket) {
        let engine = self.quotes.clone();
        let total_supply = self.total_supply;
        let debounce = self.debounce;

        self.pending = Some(Box::pin(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }
            tracing::debug!(
                amount = %ticket.amount,
                generation = ticket.generation,
                "Quote issued"
            );
            let result = engine.quote(ticket.amount, total_supply).await;
            Resolution::Quote(ticket, result)
        }));
    }

    fn apply(&mut self, resolution: Resolution) -> SessionUpdate {
        match resolution {
            Resolution::Quote(ticket, result) => {
                if !self.form.resolve_quote(ticket, &result) {
                    tracing::debug!(generation = ticket.generation, "Discarded stale quote");
                    return SessionUpdate::Discarded;
                }
                match result {
                    Ok(quote) => SessionUpdate::Quoted(quote),
                    Err(err) => self.fail(err.into()),
                }
            }
            Resolution::Shortcut(ticket, result) => {
                match self.form.resolve_shortcut(ticket, &result) {
                    ShortcutApplied::Stale => {
                        tracing::debug!(
                            generation = ticket.generation,
                            "Discarded stale shortcut conversion"
                        );
                        SessionUpdate::Discarded
                    }
                    ShortcutApplied::Converted(next) => {
                        self.schedule_quote(next);
                        SessionUpdate::AmountConverted {
                            shortcut: ticket.shortcut.label,
                            amount: self.form.amount().to_string(),
                        }
                    }
                    ShortcutApplied::Failed(requote) => {
                        if let Some(next) = requote {
                            self.schedule_quote(next);
                        }
                        let err = match result {
                            Err(err) => err.into(),
                            Ok(amount) => PurchaseError::new(
                                ErrorKind::Pricing,
                                format!("shortcut produced unusable amount {amount:?}"),
                            ),
                        };
                        self.fail(err)
                    }
                }
            }
        }
    }

    fn fail(&mut self, err: PurchaseError) -> SessionUpdate {
        tracing::warn!(kind = %err.kind, detail = %err.detail, "Pricing lookup failed");
        self.notifications.push(Notification::failure(&err));
        SessionUpdate::Failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;
    use crate::quote::tests::MockPricing;
    use crate::submit::tests::{MockWallet, TOKEN, TX};
    use crate::submit::View;

    const SUPPLY: u64 = 200_000;
    const ONE_FINNEY: u128 = 1_000_000_000_000_000;

    fn config() -> SessionConfig {
        SessionConfig {
            token: TOKEN,
            total_supply: U256::from(SUPPLY),
            default_amount: "200".into(),
            debounce: Duration::from_millis(300),
        }
    }

    fn session(
        pricing: &Arc<MockPricing>,
        wallet: Option<&Arc<MockWallet>>,
    ) -> PurchaseSession<MockPricing, MockWallet> {
        PurchaseSession::new(config(), Arc::clone(pricing), wallet.cloned())
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_quotes_default_amount() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0));
        let mut session = session(&pricing, None);
        assert!(session.is_loading());

        let update = session.next_update().await.unwrap();

        let SessionUpdate::Quoted(quote) = update else {
            panic!("expected quote, got {update:?}");
        };
        assert_eq!(quote.cost, "0.001");
        assert_eq!(pricing.cost_calls(), vec![(U256::from(SUPPLY), U256::from(200))]);
        assert!(session.can_submit());
        assert!(session.next_update().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_amount_skips_network() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0));
        let mut session = session(&pricing, None);
        session.next_update().await;

        session.set_amount("");

        assert!(session.cost().is_none());
        assert!(!session.is_loading());
        assert!(!session.can_submit());
        assert!(session.next_update().await.is_none());
        assert_eq!(pricing.cost_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentering_amount_keeps_quote() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0));
        let mut session = session(&pricing, None);
        session.next_update().await;

        session.set_amount("200");

        assert_eq!(session.cost().map(|q| q.cost.as_str()), Some("0.001"));
        assert!(session.can_submit());
        assert!(!session.is_loading());
        assert!(session.next_update().await.is_none());
        assert_eq!(pricing.cost_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentering_amount_keeps_pending_quote() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0));
        let mut session = session(&pricing, None);

        let partial =
            tokio::time::timeout(Duration::from_millis(200), session.next_update()).await;
        assert!(partial.is_err());
        session.set_amount("200");
        let update = session.next_update().await.unwrap();

        assert!(matches!(update, SessionUpdate::Quoted(q) if q.amount == U256::from(200)));
        assert_eq!(pricing.cost_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_is_coalesced() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0));
        let mut session = session(&pricing, None);

        session.set_amount("1");
        session.set_amount("12");
        session.set_amount("123");
        let update = session.next_update().await.unwrap();

        assert!(matches!(update, SessionUpdate::Quoted(q) if q.amount == U256::from(123)));
        assert_eq!(pricing.cost_calls(), vec![(U256::from(SUPPLY), U256::from(123))]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_quote_superseded() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0).with_delay(Duration::from_secs(1)));
        let mut session = PurchaseSession::<_, MockWallet>::new(
            SessionConfig {
                debounce: Duration::ZERO,
                ..config()
            },
            Arc::clone(&pricing),
            None,
        );

        // Let the quote for 200 reach the node, then change the amount.
        let partial =
            tokio::time::timeout(Duration::from_millis(100), session.next_update()).await;
        assert!(partial.is_err());
        session.set_amount("300");

        let update = session.next_update().await.unwrap();

        assert!(matches!(update, SessionUpdate::Quoted(q) if q.amount == U256::from(300)));
        assert_eq!(session.cost().unwrap().amount, U256::from(300));
        assert_eq!(
            pricing.cost_calls(),
            vec![
                (U256::from(SUPPLY), U256::from(200)),
                (U256::from(SUPPLY), U256::from(300)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shortcut_sets_amount_then_quotes() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 2000));
        let mut session = session(&pricing, None);

        let shortcut = session.select_shortcut(1).unwrap();
        assert_eq!(shortcut.label, "0.03 ETH");
        assert!(session.is_loading());

        let update = session.next_update().await.unwrap();
        assert_eq!(
            update,
            SessionUpdate::AmountConverted {
                shortcut: "0.03 ETH",
                amount: "2000".into(),
            }
        );
        assert_eq!(session.amount(), "2000");

        let update = session.next_update().await.unwrap();
        assert!(matches!(update, SessionUpdate::Quoted(q) if q.amount == U256::from(2000)));
        assert_eq!(
            pricing.inverse_calls(),
            vec![(U256::from(SUPPLY), U256::from(30 * ONE_FINNEY))]
        );
        assert_eq!(
            pricing.cost_calls().last(),
            Some(&(U256::from(SUPPLY), U256::from(2000)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_shortcut_ignored() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 2000));
        let mut session = session(&pricing, None);
        assert!(session.select_shortcut(99).is_none());
        assert_eq!(session.amount(), "200");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pricing_failure_notifies() {
        let pricing = Arc::new(MockPricing::new(0, 0));
        *pricing.cost.lock().unwrap() = Err(PricingError::Call("execution reverted".into()));
        let mut session = session(&pricing, None);

        let update = session.next_update().await.unwrap();

        assert!(matches!(update, SessionUpdate::Failed(ref e) if e.kind == ErrorKind::Pricing));
        assert!(session.cost().is_none());
        assert_eq!(session.notifications().len(), 1);
        assert_eq!(session.notifications()[0].kind, Some(ErrorKind::Pricing));

        let dismissed = session.dismiss(0).unwrap();
        assert_eq!(dismissed.message, "Failed to calculate cost. Please try again.");
        assert!(session.notifications().is_empty());
        assert!(session.dismiss(0).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_disabled_until_quoted() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0));
        let wallet = Arc::new(MockWallet::default());
        let mut session = session(&pricing, Some(&wallet));

        assert!(!session.can_submit());
        assert!(session.submit().await.is_none());
        assert!(wallet.steps().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wallet_leaves_form_untouched() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0));
        let mut session = session(&pricing, None);
        session.next_update().await;
        let calls_before = pricing.cost_calls().len();

        let err = session.submit().await.unwrap().unwrap_err();

        assert_eq!(err.kind, ErrorKind::NoWallet);
        assert_eq!(session.amount(), "200");
        assert_eq!(session.cost().unwrap().cost, "0.001");
        assert_eq!(pricing.cost_calls().len(), calls_before);
        assert_eq!(session.notifications()[0].kind, Some(ErrorKind::NoWallet));
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_submit_resets_form() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0));
        let wallet = Arc::new(MockWallet::default());
        let mut session = session(&pricing, Some(&wallet));
        session.set_amount("500");
        session.next_update().await;

        let purchase = session.submit().await.unwrap().unwrap();

        assert_eq!(purchase.tx_hash, TX);
        assert_eq!(purchase.next_view, View::Landing);
        assert_eq!(
            wallet.sent.lock().unwrap().as_slice(),
            &[(TOKEN, U256::from(500), U256::from(ONE_FINNEY))]
        );
        assert_eq!(session.amount(), "200");
        assert!(session.cost().is_none());
        assert!(!session.can_submit());
        assert!(session.notifications()[0].message.contains(&format!("{TX:#x}")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_submit_allows_retry() {
        let pricing = Arc::new(MockPricing::new(ONE_FINNEY, 0));
        let wallet = Arc::new(MockWallet::failing_at(
            "send_purchase",
            WalletError::Rpc {
                code: -32000,
                message: "insufficient funds for gas * price + value".into(),
            },
        ));
        let mut session = session(&pricing, Some(&wallet));
        session.next_update().await;

        let err = session.submit().await.unwrap().unwrap_err();

        assert_eq!(err.kind, ErrorKind::InsufficientFunds);
        assert_eq!(session.amount(), "200");
        assert!(session.can_submit());
        assert_eq!(
            session.notifications()[0].message,
            ErrorKind::InsufficientFunds.user_message()
        );
    }
}
