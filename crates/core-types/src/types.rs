// In crates/core-types/src/types.rs

use crate::{Chain, detect_chain};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The recommendation produced by a single indicator or by the final vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::Hold => "HOLD",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trackable asset on a specific chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique key within a resolved asset list.
    pub id: String,
    /// Key into the market-data provider. Several assets may share one.
    pub market_id: String,
    pub symbol: String,
    pub display_name: String,
    pub chain: Chain,
    pub decimals: u32,
    /// Whether the balance comes from the chain's native-currency lookup.
    pub uses_native_balance: bool,
    /// Lower-cased contract address for token assets.
    pub token_contract: Option<String>,
}

impl Asset {
    fn native(id: &str, symbol: &str, display_name: &str, chain: Chain, decimals: u32) -> Self {
        Self {
            id: id.to_string(),
            market_id: id.to_string(),
            symbol: symbol.to_string(),
            display_name: display_name.to_string(),
            chain,
            decimals,
            uses_native_balance: true,
            token_contract: None,
        }
    }

    /// The canonical asset tracked for a chain when the user saved an address for it.
    pub fn default_for(chain: Chain) -> Self {
        match chain {
            Chain::Bitcoin => Self::native("bitcoin", "BTC", "Bitcoin", chain, 8),
            Chain::Ethereum => Self::native("ethereum", "ETH", "Ethereum", chain, 18),
            Chain::Solana => Self::native("solana", "SOL", "Solana", chain, 9),
            Chain::Dogecoin => Self::native("dogecoin", "DOGE", "Dogecoin", chain, 8),
            Chain::Cardano => Self::native("cardano", "ADA", "Cardano", chain, 6),
            // Base's native currency is ETH and is priced as such.
            Chain::Base => Self {
                market_id: "ethereum".to_string(),
                ..Self::native("base-native-eth", "ETH", "Base ETH", chain, 18)
            },
        }
    }

    /// An ERC-20 style token discovered in a wallet's holdings.
    pub fn token(
        chain: Chain,
        contract: &str,
        market_id: &str,
        symbol: &str,
        display_name: &str,
        decimals: u32,
    ) -> Self {
        let contract = contract.to_lowercase();
        Self {
            id: format!("{}:{}", chain, contract),
            market_id: market_id.to_string(),
            symbol: symbol.to_uppercase(),
            display_name: display_name.to_string(),
            chain,
            decimals,
            uses_native_balance: false,
            token_contract: Some(contract),
        }
    }
}

/// The user's saved addresses: one slot per chain plus a shared slot that
/// Ethereum and Base fall back to, since both use the same address format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletAddressSet {
    pub bitcoin: String,
    pub ethereum: String,
    pub base: String,
    pub solana: String,
    pub dogecoin: String,
    pub cardano: String,
    pub evm: String,
}

impl WalletAddressSet {
    /// The trimmed, non-blank address saved for `chain`, if any.
    pub fn for_chain(&self, chain: Chain) -> Option<&str> {
        let own = non_blank(self.slot(chain));
        match chain {
            Chain::Ethereum | Chain::Base => own.or_else(|| non_blank(&self.evm)),
            _ => own,
        }
    }

    pub fn slot(&self, chain: Chain) -> &str {
        match chain {
            Chain::Bitcoin => &self.bitcoin,
            Chain::Ethereum => &self.ethereum,
            Chain::Base => &self.base,
            Chain::Solana => &self.solana,
            Chain::Dogecoin => &self.dogecoin,
            Chain::Cardano => &self.cardano,
        }
    }

    pub fn slot_mut(&mut self, chain: Chain) -> &mut String {
        match chain {
            Chain::Bitcoin => &mut self.bitcoin,
            Chain::Ethereum => &mut self.ethereum,
            Chain::Base => &mut self.base,
            Chain::Solana => &mut self.solana,
            Chain::Dogecoin => &mut self.dogecoin,
            Chain::Cardano => &mut self.cardano,
        }
    }

    /// Stores `address` in the slot of the chain it is detected as.
    ///
    /// Hex addresses go to the shared EVM slot since they are valid on both
    /// Ethereum and Base. Returns the detected chain, or `None` if the format
    /// is not recognised and nothing was stored.
    pub fn assign(&mut self, address: &str) -> Option<Chain> {
        let chain = detect_chain(address)?;
        let slot = if chain.is_evm() { &mut self.evm } else { self.slot_mut(chain) };
        *slot = address.trim().to_string();
        Some(chain)
    }

    /// A copy with every slot trimmed, as persisted by the preferences store.
    pub fn trimmed(&self) -> Self {
        Self {
            bitcoin: self.bitcoin.trim().to_string(),
            ethereum: self.ethereum.trim().to_string(),
            base: self.base.trim().to_string(),
            solana: self.solana.trim().to_string(),
            dogecoin: self.dogecoin.trim().to_string(),
            cardano: self.cardano.trim().to_string(),
            evm: self.evm.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Chain::ALL.iter().all(|chain| self.for_chain(*chain).is_none())
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// A single observed USD price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price_usd: f64,
}

/// The verdict of one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmSignal {
    pub algorithm: String,
    pub action: TradeAction,
    pub reason: String,
}

impl AlgorithmSignal {
    pub fn new(algorithm: impl Into<String>, action: TradeAction, reason: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            action,
            reason: reason.into(),
        }
    }
}

/// A wallet balance. `Unknown` covers both unsupported lookups and absorbed
/// upstream failures; it is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "amount", rename_all = "lowercase")]
pub enum Balance {
    Known(f64),
    #[default]
    Unknown,
}

impl Balance {
    /// Builds a known balance, rejecting negative and non-finite amounts.
    pub fn known(amount: f64) -> Self {
        if amount.is_finite() && amount >= 0.0 {
            Balance::Known(amount)
        } else {
            Balance::Unknown
        }
    }

    pub fn amount(&self) -> Option<f64> {
        match self {
            Balance::Known(amount) => Some(*amount),
            Balance::Unknown => None,
        }
    }
}

impl From<Option<f64>> for Balance {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Balance::Unknown, Balance::known)
    }
}

/// One token position reported by the token-holdings endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    /// Lower-cased contract address.
    pub contract: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    /// Amount already scaled by `decimals`.
    pub amount: f64,
}

/// The per-asset result of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAnalysis {
    pub asset: Asset,
    pub current_price_usd: f64,
    pub price_change_24h_pct: Option<f64>,
    pub balance: Balance,
    pub history: Vec<PricePoint>,
    pub algorithm_signals: Vec<AlgorithmSignal>,
    pub final_action: TradeAction,
}

impl AssetAnalysis {
    /// USD value of the holding, when the balance is known.
    pub fn holding_value_usd(&self) -> Option<f64> {
        self.balance.amount().map(|amount| amount * self.current_price_usd)
    }
}
