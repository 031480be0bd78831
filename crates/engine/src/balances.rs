// In crates/engine/src/balances.rs

use crate::cache::TokenHoldingsCache;
use api_client::{EvmRpcApi, ExplorerApi};
use async_trait::async_trait;
use core_types::units::{scale_decimal_string, scale_hex_quantity};
use core_types::{Asset, Balance, Chain, WalletAddressSet};
use std::sync::Arc;

/// Native EVM balances are always denominated in wei.
const WEI_DECIMALS: u32 = 18;

/// Fetches one asset's balance for one address. Failures surface as `Balance::Unknown`.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn balance(&self, asset: &Asset, address: &str) -> Balance;
}

/// Native balances from the generic chain explorer, scaled by the asset's decimals.
pub struct ExplorerBalanceSource {
    api: Arc<dyn ExplorerApi>,
}

impl ExplorerBalanceSource {
    pub fn new(api: Arc<dyn ExplorerApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BalanceSource for ExplorerBalanceSource {
    async fn balance(&self, asset: &Asset, address: &str) -> Balance {
        let raw = match self.api.address_balance(asset.chain, address).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(asset = %asset.id, chain = %asset.chain, error = %e, "Explorer balance unavailable.");
                return Balance::Unknown;
            }
        };
        match scale_decimal_string(&raw, asset.decimals) {
            Ok(amount) => Balance::known(amount),
            Err(e) => {
                tracing::debug!(asset = %asset.id, error = %e, "Unreadable explorer balance.");
                Balance::Unknown
            }
        }
    }
}

/// Native balances via `eth_getBalance`.
pub struct EvmNativeBalanceSource {
    api: Arc<dyn EvmRpcApi>,
}

impl EvmNativeBalanceSource {
    pub fn new(api: Arc<dyn EvmRpcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BalanceSource for EvmNativeBalanceSource {
    async fn balance(&self, asset: &Asset, address: &str) -> Balance {
        let hex = match self.api.get_balance(asset.chain, address).await {
            Ok(hex) => hex,
            Err(e) => {
                tracing::debug!(asset = %asset.id, chain = %asset.chain, error = %e, "RPC balance unavailable.");
                return Balance::Unknown;
            }
        };
        match scale_hex_quantity(&hex, WEI_DECIMALS) {
            Ok(amount) => Balance::known(amount),
            Err(e) => {
                tracing::debug!(asset = %asset.id, error = %e, "Unreadable RPC balance.");
                Balance::Unknown
            }
        }
    }
}

/// Token balances read from the cached holdings of the address.
pub struct TokenHoldingsBalanceSource {
    holdings: Arc<TokenHoldingsCache>,
}

impl TokenHoldingsBalanceSource {
    pub fn new(holdings: Arc<TokenHoldingsCache>) -> Self {
        Self { holdings }
    }
}

#[async_trait]
impl BalanceSource for TokenHoldingsBalanceSource {
    async fn balance(&self, asset: &Asset, address: &str) -> Balance {
        let Some(contract) = asset.token_contract.as_deref() else {
            return Balance::Unknown;
        };
        self.holdings.amount_of(address, contract).await.into()
    }
}

/// Picks the balance source for an asset from its chain and shape.
pub struct BalanceRouter {
    explorer: Box<dyn BalanceSource>,
    evm_native: Box<dyn BalanceSource>,
    token_holdings: Box<dyn BalanceSource>,
}

impl BalanceRouter {
    pub fn new(
        explorer: Box<dyn BalanceSource>,
        evm_native: Box<dyn BalanceSource>,
        token_holdings: Box<dyn BalanceSource>,
    ) -> Self {
        Self {
            explorer,
            evm_native,
            token_holdings,
        }
    }

    /// The balance of `asset` at the address saved for its chain.
    pub async fn balance(&self, asset: &Asset, wallets: &WalletAddressSet) -> Balance {
        let Some(address) = wallets.for_chain(asset.chain) else {
            return Balance::Unknown;
        };
        let is_token = asset.token_contract.is_some();

        match asset.chain {
            // ERC-20 balances on Ethereum mainnet are not looked up.
            Chain::Ethereum if is_token => Balance::Unknown,
            Chain::Base if is_token => self.token_holdings.balance(asset, address).await,
            Chain::Ethereum | Chain::Base => self.evm_native.balance(asset, address).await,
            Chain::Bitcoin | Chain::Solana | Chain::Dogecoin | Chain::Cardano => {
                if asset.uses_native_balance {
                    self.explorer.balance(asset, address).await
                } else {
                    Balance::Unknown
                }
            }
        }
    }
}
