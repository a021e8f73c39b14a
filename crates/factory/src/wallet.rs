//! Local-key wallet: the signing capability the purchase workflow is given.

use alloy::{
    network::ReceiptResponse,
    primitives::{Address, TxHash, U256},
    providers::{PendingTransactionBuilder, PendingTransactionError, Provider},
    signers::local::PrivateKeySigner,
    transports::TransportError,
};
use memepad_core::Settings;
use memepad_purchase::{ErrorKind, PurchaseError, Wallet, WalletError};

use crate::{
    abi::MemeTokenFactory,
    provider::{FactoryProvider, create_signing_provider},
    token::{CREATION_FEE_WEI, CreateTokenRequest},
};

pub struct SignerWallet {
    provider: FactoryProvider,
    account: Address,
    contract: MemeTokenFactory::MemeTokenFactoryInstance<FactoryProvider>,
}

impl SignerWallet {
    pub fn connect(rpc_url: &str, private_key: &str, factory: Address) -> eyre::Result<Self> {
        let signer: PrivateKeySigner = private_key.trim().parse()?;
        let account = signer.address();
        let provider = create_signing_provider(rpc_url, signer)?;
        let contract = MemeTokenFactory::new(factory, provider.clone());
        Ok(Self {
            provider,
            account,
            contract,
        })
    }

    /// The configured wallet, or `None` when no private key is set.
    pub fn from_settings(settings: &Settings) -> eyre::Result<Option<Self>> {
        let Some(key) = settings.wallet_private_key.as_deref() else {
            return Ok(None);
        };
        let factory: Address = settings.factory_address.parse()?;
        Self::connect(&settings.rpc_url, key, factory).map(Some)
    }

    pub fn account(&self) -> Address {
        self.account
    }

    /// Create a new meme token, paying the fixed creation fee.
    pub async fn create_meme_token(
        &self,
        request: &CreateTokenRequest,
    ) -> Result<TxHash, PurchaseError> {
        request
            .validate()
            .map_err(|e| PurchaseError::new(ErrorKind::Generic, e.to_string()))?;

        let pending = self
            .contract
            .createMemeToken(
                request.name.trim().to_string(),
                request.symbol.trim().to_string(),
                request.image_url.trim().to_string(),
                request.description.trim().to_string(),
            )
            .value(U256::from(CREATION_FEE_WEI))
            .send()
            .await
            .map_err(contract_error)?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(tx = %tx_hash, symbol = %request.symbol, "Token creation submitted");

        let confirmed = self.wait_for_confirmation(tx_hash).await?;
        tracing::info!(tx = %confirmed, "Token created");
        Ok(confirmed)
    }
}

impl Wallet for SignerWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        // A local key is always authorised; this only proves the node is reachable.
        let chain_id = self.provider.get_chain_id().await.map_err(transport_error)?;
        tracing::debug!(account = %self.account, chain_id, "Wallet ready");
        Ok(vec![self.account])
    }

    async fn send_purchase(
        &self,
        token: Address,
        amount: U256,
        value: U256,
    ) -> Result<TxHash, WalletError> {
        let pending = self
            .contract
            .buyMemeToken(token, amount)
            .value(value)
            .send()
            .await
            .map_err(contract_error)?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxHash, WalletError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(pending_error)?;
        if !receipt.status() {
            return Err(WalletError::Other(format!(
                "transaction {tx_hash:#x} reverted"
            )));
        }
        Ok(receipt.transaction_hash())
    }
}

// ─── Error mapping ──────────────────────────────────────────────────────────

fn transport_error(err: TransportError) -> WalletError {
    match err.as_error_resp() {
        Some(payload) => WalletError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        None => WalletError::Transport(err.to_string()),
    }
}

fn contract_error(err: alloy::contract::Error) -> WalletError {
    match err {
        alloy::contract::Error::TransportError(err) => transport_error(err),
        other => WalletError::Other(other.to_string()),
    }
}

fn pending_error(err: PendingTransactionError) -> WalletError {
    match err {
        PendingTransactionError::TransportError(err) => transport_error(err),
        other => WalletError::Other(other.to_string()),
    }
}
