// In crates/core-types/src/chain.rs

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of networks the monitor knows how to classify and query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Bitcoin,
    Ethereum,
    Base,
    Solana,
    Dogecoin,
    Cardano,
}

impl Chain {
    /// Every supported chain, in the order default assets are listed.
    pub const ALL: [Chain; 6] = [
        Chain::Bitcoin,
        Chain::Ethereum,
        Chain::Solana,
        Chain::Dogecoin,
        Chain::Cardano,
        Chain::Base,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "bitcoin",
            Chain::Ethereum => "ethereum",
            Chain::Base => "base",
            Chain::Solana => "solana",
            Chain::Dogecoin => "dogecoin",
            Chain::Cardano => "cardano",
        }
    }

    /// EVM chains share the hex address format and the `eth_getBalance` RPC.
    pub fn is_evm(&self) -> bool {
        matches!(self, Chain::Ethereum | Chain::Base)
    }

    /// Only Base holdings are discovered dynamically from the token-holdings endpoint.
    pub fn supports_token_discovery(&self) -> bool {
        matches!(self, Chain::Base)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Chain::ALL
            .into_iter()
            .find(|chain| chain.as_str() == normalized)
            .ok_or_else(|| Error::UnknownChain(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chain_names_case_insensitively() {
        assert_eq!("Bitcoin".parse::<Chain>().unwrap(), Chain::Bitcoin);
        assert_eq!(" base ".parse::<Chain>().unwrap(), Chain::Base);
        assert_eq!(
            "litecoin".parse::<Chain>(),
            Err(Error::UnknownChain("litecoin".to_string()))
        );
    }

    #[test]
    fn only_base_supports_discovery() {
        let discovering: Vec<Chain> = Chain::ALL
            .into_iter()
            .filter(Chain::supports_token_discovery)
            .collect();
        assert_eq!(discovering, vec![Chain::Base]);
        assert!(Chain::Ethereum.is_evm());
        assert!(!Chain::Solana.is_evm());
    }
}
