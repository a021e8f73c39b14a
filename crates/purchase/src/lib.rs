//! Token purchase workflow: quoting, amount selection and submission.

pub mod error;
pub mod form;
pub mod quote;
pub mod session;
pub mod shortcut;
pub mod source;
pub mod submit;
pub mod units;

pub use error::{ErrorKind, PricingError, PurchaseError, WalletError};
pub use quote::{CostQuote, QuoteEngine};
pub use session::{Notification, PurchaseSession, SessionConfig, SessionUpdate};
pub use shortcut::{AmountSelector, PREDEFINED_SHORTCUTS, Shortcut};
pub use source::{PricingSource, Wallet};
pub use submit::{Purchase, PurchaseSubmitter, SubmissionResult, View};
