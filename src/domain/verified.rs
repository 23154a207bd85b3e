//! Verified Token Registry
//!
//! Curated allow-list of well-known mints, loaded once at startup from a
//! JSON object of `symbol -> mint address`. A pair is "verified" when its
//! base mint is in this set. Loading is best-effort: a missing or
//! malformed file yields an empty registry and verification tagging
//! becomes a no-op rather than a crash.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::warn;

/// Symbol-to-mint allow-list with a mint set for membership checks.
#[derive(Debug, Clone, Default)]
pub struct VerifiedRegistry {
    by_symbol: HashMap<String, String>,
    mints: HashSet<String>,
}

impl VerifiedRegistry {
    /// Load from a JSON file of `{"SYMBOL": "mint", ...}`. Any failure is
    /// absorbed into an empty registry.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "verified token list unavailable");
                return Self::default();
            }
        };
        match serde_json::from_str::<HashMap<String, String>>(&raw) {
            Ok(map) => Self::from_entries(map),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "verified token list malformed");
                Self::default()
            }
        }
    }

    /// Build from symbol/mint pairs. Symbols are normalized to uppercase.
    pub fn from_entries<I, S, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, M)>,
        S: Into<String>,
        M: Into<String>,
    {
        let by_symbol: HashMap<String, String> = entries
            .into_iter()
            .map(|(s, m)| (s.into().to_uppercase(), m.into()))
            .collect();
        let mints = by_symbol.values().cloned().collect();
        Self { by_symbol, mints }
    }

    /// Membership check for the verification tag.
    pub fn contains_mint(&self, mint: &str) -> bool {
        self.mints.contains(mint)
    }

    /// All registered mint addresses, for the verified discovery board.
    pub fn mints(&self) -> Vec<String> {
        let mut mints: Vec<String> = self.mints.iter().cloned().collect();
        mints.sort();
        mints
    }

    pub fn mint_for(&self, symbol: &str) -> Option<&str> {
        self.by_symbol
            .get(&symbol.to_uppercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"SOL": "So11111111111111111111111111111111111111112",
                 "usdc": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"}"#,
        )
        .unwrap();

        let registry = VerifiedRegistry::load(file.path());

        assert_eq!(registry.len(), 2);
        assert!(registry.contains_mint("So11111111111111111111111111111111111111112"));
        // Symbols normalize to uppercase.
        assert_eq!(
            registry.mint_for("USDC"),
            Some("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")
        );
    }

    #[test]
    fn test_missing_file_yields_empty_registry() {
        let registry = VerifiedRegistry::load("/nonexistent/verified_tokens.json");
        assert!(registry.is_empty());
        assert!(!registry.contains_mint("So11111111111111111111111111111111111111112"));
    }

    #[test]
    fn test_malformed_file_yields_empty_registry() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();

        let registry = VerifiedRegistry::load(file.path());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_mints_listing_is_sorted() {
        let registry = VerifiedRegistry::from_entries([("B", "mint-b"), ("A", "mint-a")]);
        assert_eq!(registry.mints(), vec!["mint-a", "mint-b"]);
    }
}
