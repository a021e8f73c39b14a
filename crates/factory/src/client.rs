use alloy::primitives::{Address, U256};
use memepad_core::AppError;
use memepad_purchase::{PricingError, PricingSource};

use crate::{
    abi::{ERC20, MemeTokenFactory},
    provider::{FactoryProvider, create_provider},
    token::MemeToken,
};

/// Read-only access to the token factory over JSON-RPC.
#[derive(Clone)]
pub struct FactoryClient {
    provider: FactoryProvider,
    contract: MemeTokenFactory::MemeTokenFactoryInstance<FactoryProvider>,
}

impl FactoryClient {
    pub fn new(provider: FactoryProvider, factory: Address) -> Self {
        let contract = MemeTokenFactory::new(factory, provider.clone());
        Self { provider, contract }
    }

    /// Connect to `rpc_url` for the factory deployed at `factory`.
    pub fn connect(rpc_url: &str, factory: &str) -> eyre::Result<Self> {
        let factory: Address = factory.parse()?;
        Ok(Self::new(create_provider(rpc_url)?, factory))
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Every token the factory has created.
    pub async fn list_tokens(&self) -> Result<Vec<MemeToken>, AppError> {
        let tokens = self
            .contract
            .getAllMemeTokens()
            .call()
            .await
            .map_err(|e| AppError::Rpc(e.to_string()))?;
        tracing::debug!(count = tokens.len(), "Fetched meme tokens");
        Ok(tokens.into_iter().map(MemeToken::from).collect())
    }

    /// Registry entry for one token.
    pub async fn token_details(&self, token: Address) -> Result<MemeToken, AppError> {
        let data = self
            .contract
            .addressToMemeTokenMapping(token)
            .call()
            .await
            .map_err(|e| AppError::Rpc(e.to_string()))?;
        if data.name.is_empty() {
            return Err(AppError::NotFound(format!("token {token:#x}")));
        }
        Ok(MemeToken::from_parts(
            data.name,
            data.symbol,
            data.description,
            data.tokenImageUrl,
            data.fundingRaised,
            data.tokenAddress,
            data.creatorAddress,
        ))
    }

    /// Current supply of `token` in whole tokens, as the pricing functions expect.
    pub async fn supply_snapshot(&self, token: Address) -> Result<U256, AppError> {
        let erc20 = ERC20::new(token, self.provider.clone());
        let raw = erc20
            .totalSupply()
            .call()
            .await
            .map_err(|e| AppError::Rpc(e.to_string()))?;
        let decimals = erc20
            .decimals()
            .call()
            .await
            .map_err(|e| AppError::Rpc(e.to_string()))?;
        let supply = whole_tokens(raw, decimals)?;
        tracing::debug!(token = %token, %supply, "Supply snapshot");
        Ok(supply)
    }
}

pub(crate) fn whole_tokens(raw: U256, decimals: u8) -> Result<U256, AppError> {
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .map(|unit| raw / unit)
        .ok_or_else(|| AppError::Decode(format!("unsupported token decimals: {decimals}")))
}

impl PricingSource for FactoryClient {
    async fn calculate_cost(&self, total_supply: U256, amount: U256) -> Result<U256, PricingError> {
        self.contract
            .calculateCost(total_supply, amount)
            .call()
            .await
            .map_err(|e| PricingError::Call(e.to_string()))
    }

    async fn calculate_token_amount(
        &self,
        total_supply: U256,
        value: U256,
    ) -> Result<U256, PricingError> {
        self.contract
            .calculateTokenAmount(total_supply, value)
            .call()
            .await
            .map_err(|e| PricingError::Call(e.to_string()))
    }
}
