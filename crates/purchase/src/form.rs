//! Purchase form state: the entered amount, its quote, and what is in flight.
//!
//! Every change to the amount bumps a generation counter. Requests are
//! tagged with the generation they were issued under and their results are
//! only applied while that generation is still current, so a late response
//! can never overwrite the quote of a newer amount.

use alloy::primitives::U256;

use crate::{
    error::PricingError,
    quote::CostQuote,
    shortcut::Shortcut,
    units::parse_token_amount,
};

/// Cost lookup issued for one amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTicket {
    pub generation: u64,
    pub amount: U256,
}

/// Inverse lookup issued for one shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutTicket {
    pub generation: u64,
    pub shortcut: Shortcut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlight {
    Quote(QuoteTicket),
    Shortcut(ShortcutTicket),
}

/// Result of applying a shortcut conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutApplied {
    /// The amount was overwritten; quote it with the returned ticket.
    Converted(QuoteTicket),
    /// The conversion failed; the amount is unchanged and needs a fresh quote if set.
    Failed(Option<QuoteTicket>),
    Stale,
}

#[derive(Debug, Clone)]
pub struct PurchaseForm {
    default_amount: String,
    amount: String,
    cost: Option<CostQuote>,
    in_flight: Option<InFlight>,
    generation: u64,
}

impl PurchaseForm {
    /// A form holding `default_amount`, not yet quoted.
    pub fn new(default_amount: impl Into<String>) -> Self {
        let default_amount = default_amount.into();
        Self {
            amount: default_amount.clone(),
            default_amount,
            cost: None,
            in_flight: None,
            generation: 0,
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn cost(&self) -> Option<&CostQuote> {
        self.cost.as_ref()
    }

    /// True while a quote or shortcut conversion is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Submission needs a numeric amount, a quote priced for exactly that
    /// amount, and no lookup in flight.
    pub fn can_submit(&self) -> bool {
        let Some(amount) = parse_token_amount(&self.amount) else {
            return false;
        };
        !self.is_loading() && self.cost.as_ref().is_some_and(|c| c.amount == amount)
    }

    /// True when `input` would not change anything: it is the amount already
    /// held, and that amount is either quoted or being quoted. Typing over a
    /// shortcut conversion always counts as a change.
    pub fn is_unchanged(&self, input: &str) -> bool {
        if input != self.amount {
            return false;
        }
        match self.in_flight {
            Some(InFlight::Quote(_)) => true,
            Some(InFlight::Shortcut(_)) => false,
            None => self.cost.is_some(),
        }
    }

    /// Replace the amount. Clears the current quote and supersedes anything in
    /// flight; returns a ticket when the new amount is worth quoting.
    ///
    /// Re-entering the held amount is a no-op, unless its last quote failed.
    pub fn set_amount(&mut self, input: impl Into<String>) -> Option<QuoteTicket> {
        let input = input.into();
        if self.is_unchanged(&input) {
            return None;
        }
        self.replace_amount(input)
    }

    fn replace_amount(&mut self, input: String) -> Option<QuoteTicket> {
        self.amount = input;
        self.generation += 1;
        self.cost = None;
        self.in_flight = None;

        let amount = parse_token_amount(&self.amount)?;
        let ticket = QuoteTicket {
            generation: self.generation,
            amount,
        };
        self.in_flight = Some(InFlight::Quote(ticket));
        Some(ticket)
    }

    /// Re-issue a quote for the current amount without changing it.
    pub fn requote(&mut self) -> Option<QuoteTicket> {
        let amount = self.amount.clone();
        self.replace_amount(amount)
    }

    /// Start a shortcut conversion. Supersedes anything in flight; the amount
    /// and any quote already held for it stay in place until it resolves.
    pub fn begin_shortcut(&mut self, shortcut: Shortcut) -> ShortcutTicket {
        self.generation += 1;
        let ticket = ShortcutTicket {
            generation: self.generation,
            shortcut,
        };
        self.in_flight = Some(InFlight::Shortcut(ticket));
        ticket
    }

    /// Apply a finished quote. Returns `false` if the ticket was superseded.
    pub fn resolve_quote(
        &mut self,
        ticket: QuoteTicket,
        result: &Result<CostQuote, PricingError>,
    ) -> bool {
        if self.in_flight != Some(InFlight::Quote(ticket)) {
            return false;
        }
        self.in_flight = None;
        self.cost = match result {
            Ok(quote) if quote.amount == ticket.amount => Some(quote.clone()),
            _ => None,
        };
        true
    }

    /// Apply a finished shortcut conversion.
    pub fn resolve_shortcut(
        &mut self,
        ticket: ShortcutTicket,
        result: &Result<String, PricingError>,
    ) -> ShortcutApplied {
        if self.in_flight != Some(InFlight::Shortcut(ticket)) {
            return ShortcutApplied::Stale;
        }
        self.in_flight = None;
        match result {
            Ok(amount) => match self.replace_amount(amount.clone()) {
                Some(next) => ShortcutApplied::Converted(next),
                None => ShortcutApplied::Failed(None),
            },
            Err(_) if self.cost.is_none() => ShortcutApplied::Failed(self.requote()),
            Err(_) => ShortcutApplied::Failed(None),
        }
    }

    /// Back to the default amount after a completed purchase.
    pub fn reset(&mut self) -> Option<QuoteTicket> {
        let default_amount = self.default_amount.clone();
        self.replace_amount(default_amount)
    }
}
