use alloy::{
    providers::{DynProvider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};

/// The RPC provider type used throughout the application.
///
/// Type-erased so read-only and wallet-backed providers are interchangeable.
pub type FactoryProvider = DynProvider;

/// Create a read-only HTTP provider from an RPC URL string.
pub fn create_provider(rpc_url: &str) -> eyre::Result<FactoryProvider> {
    let url = rpc_url.parse()?;
    let provider = ProviderBuilder::new().connect_http(url);
    Ok(DynProvider::new(provider))
}

/// Create an HTTP provider that signs and fills transactions with `signer`.
pub fn create_signing_provider(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> eyre::Result<FactoryProvider> {
    let url = rpc_url.parse()?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
    Ok(DynProvider::new(provider))
}
