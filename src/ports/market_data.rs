//! Market Data Port
//!
//! Abstraction over the upstream pair-listing API. Implementations absorb
//! every upstream failure: a method never errors, it returns an empty
//! `Sourced::fallback` value instead, and the caller renders whatever it
//! got. `Sourced` keeps the fetched-vs-defaulted distinction visible for
//! tests even though the pipeline itself only reads the value.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::pair::PairSnapshot;

/// Where a returned value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Fresh from the upstream service.
    Upstream,
    /// Served from a TTL cache.
    Cache,
    /// Default substituted after an absorbed failure.
    Fallback,
}

/// A value tagged with its origin.
#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub value: T,
    pub origin: DataOrigin,
}

impl<T> Sourced<T> {
    pub fn upstream(value: T) -> Self {
        Self {
            value,
            origin: DataOrigin::Upstream,
        }
    }

    pub fn cached(value: T) -> Self {
        Self {
            value,
            origin: DataOrigin::Cache,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            origin: DataOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// One row of a discovery feed (latest profiles, top boosted).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHighlight {
    #[serde(default)]
    pub token_address: String,
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Upstream pair-listing operations.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Free-text search across pairs.
    async fn search(&self, query: &str) -> Sourced<Vec<PairSnapshot>>;

    /// All venues trading a given token.
    async fn pairs_for_token(&self, token_address: &str) -> Sourced<Vec<PairSnapshot>>;

    /// Batch lookup; implementations cap the address count (30 upstream).
    async fn pairs_for_tokens(&self, token_addresses: &[String]) -> Sourced<Vec<PairSnapshot>>;

    /// Latest token profiles, pre-filtered to the target chain.
    async fn latest_profiles(&self) -> Sourced<Vec<TokenHighlight>>;

    /// Top boosted tokens, pre-filtered to the target chain.
    async fn top_boosted(&self) -> Sourced<Vec<TokenHighlight>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sourced_constructors() {
        assert_eq!(Sourced::upstream(1).origin, DataOrigin::Upstream);
        assert_eq!(Sourced::cached(1).origin, DataOrigin::Cache);
        assert!(Sourced::fallback(Vec::<u8>::new()).is_fallback());
        assert_eq!(Sourced::upstream(7).into_value(), 7);
    }

    #[test]
    fn test_highlight_parses_discovery_row() {
        let row: TokenHighlight = serde_json::from_value(serde_json::json!({
            "tokenAddress": "Mint111",
            "chainId": "solana",
            "url": "https://example.org/t/Mint111",
            "icon": "https://example.org/i.png"
        }))
        .unwrap();
        assert_eq!(row.token_address, "Mint111");
        assert_eq!(row.chain_id, "solana");
    }
}
