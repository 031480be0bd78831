// In crates/core-types/src/address.rs

use crate::Chain;
use once_cell::sync::Lazy;
use regex::Regex;

static EVM_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap());
static CARDANO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^addr1[0-9a-z]{20,}$").unwrap());
static DOGECOIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^D[5-9A-HJ-NP-U][1-9A-HJ-NP-Za-km-z]{32}$").unwrap());
static BITCOIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(bc1[ac-hj-np-z02-9]{11,71}|[13][a-km-zA-HJ-NP-Z1-9]{25,34})$").unwrap()
});
static SOLANA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").unwrap());

/// Address formats in precedence order. Several base58 formats overlap (a legacy
/// bitcoin or dogecoin address is also a valid-looking solana key), so the first
/// match wins and the order must not change.
static PATTERNS: [(&Lazy<Regex>, Chain); 5] = [
    (&EVM_HEX, Chain::Ethereum),
    (&CARDANO, Chain::Cardano),
    (&DOGECOIN, Chain::Dogecoin),
    (&BITCOIN, Chain::Bitcoin),
    (&SOLANA, Chain::Solana),
];

/// Classifies a wallet address string by its format.
///
/// Surrounding whitespace is ignored. Blank input and unrecognised formats yield `None`.
pub fn detect_chain(address: &str) -> Option<Chain> {
    let normalized = address.trim();
    if normalized.is_empty() {
        return None;
    }

    PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(normalized))
        .map(|(_, chain)| *chain)
}
