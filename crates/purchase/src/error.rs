use std::fmt;

use thiserror::Error;

/// EIP-1193 provider error code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

/// User-facing failure categories for the purchase workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoWallet,
    UserRejected,
    Rpc,
    InsufficientFunds,
    Pricing,
    Generic,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NoWallet => "NoWalletError",
            ErrorKind::UserRejected => "UserRejectedError",
            ErrorKind::Rpc => "RpcError",
            ErrorKind::InsufficientFunds => "InsufficientFundsError",
            ErrorKind::Pricing => "PricingError",
            ErrorKind::Generic => "GenericFailure",
        }
    }

    /// Message shown in the notification for this kind of failure.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::NoWallet => "No wallet detected. Please install a wallet to make purchases.",
            ErrorKind::UserRejected => "The request was rejected in your wallet.",
            ErrorKind::Rpc => "The network request failed. Please try again.",
            ErrorKind::InsufficientFunds => {
                "Insufficient funds to complete this purchase. Top up your wallet and retry."
            }
            ErrorKind::Pricing => "Failed to calculate cost. Please try again.",
            ErrorKind::Generic => "Failed to complete purchase. Please try again.",
        }
    }

    /// Whether re-initiating the same action can succeed without outside intervention.
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::NoWallet)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a cost or inverse-cost query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("pricing call failed: {0}")]
    Call(String),

    #[error("pricing returned an unusable value: {0}")]
    Unusable(String),
}

/// Failure reported by the wallet or the RPC node behind it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// JSON-RPC / EIP-1193 error response carrying a structured code.
    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}

impl WalletError {
    pub fn code(&self) -> Option<i64> {
        match self {
            WalletError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            WalletError::Rpc { message, .. } => message,
            WalletError::Transport(message) | WalletError::Other(message) => message,
        }
    }

    /// Map this failure onto the user-facing taxonomy.
    ///
    /// Structured codes are consulted first. Message text is only inspected
    /// as a fallback, because node and wallet wording is not standardised.
    pub fn classify(&self) -> ErrorKind {
        if self.code() == Some(USER_REJECTED_CODE) {
            return ErrorKind::UserRejected;
        }

        let message = self.message().to_ascii_lowercase();
        if message.contains("insufficient funds") {
            return ErrorKind::InsufficientFunds;
        }
        if message.contains("user rejected")
            || message.contains("user denied")
            || message.contains("action_rejected")
        {
            return ErrorKind::UserRejected;
        }

        match self {
            WalletError::Rpc { .. } | WalletError::Transport(_) => ErrorKind::Rpc,
            WalletError::Other(_) => ErrorKind::Generic,
        }
    }
}

/// A classified failure of the purchase workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct PurchaseError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl PurchaseError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn no_wallet() -> Self {
        Self::new(ErrorKind::NoWallet, "no wallet provider configured")
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

impl From<WalletError> for PurchaseError {
    fn from(err: WalletError) -> Self {
        Self::new(err.classify(), err.to_string())
    }
}

impl From<PricingError> for PurchaseError {
    fn from(err: PricingError) -> Self {
        Self::new(ErrorKind::Pricing, err.to_string())
    }
}
