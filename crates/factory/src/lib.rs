pub mod abi;
pub mod client;
pub mod provider;
pub mod token;
pub mod wallet;

pub use abi::{ERC20, MemeTokenFactory};
pub use client::FactoryClient;
pub use provider::{create_provider, create_signing_provider};
pub use token::{CreateTokenRequest, MemeToken};
pub use wallet::SignerWallet;
