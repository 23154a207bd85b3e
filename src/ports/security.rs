//! Token Security Port
//!
//! Abstraction over the on-chain mint authority lookup. Like the market
//! data port, implementations never error: any failure collapses to the
//! safe default (no authorities, so not mintable and not freezable) tagged
//! as a fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::market_data::Sourced;

/// Authority snapshot for one token mint.
///
/// An authority that is still set means the matching capability is live:
/// a mint authority can inflate supply, a freeze authority can freeze
/// holder accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintSecurity {
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
}

impl MintSecurity {
    /// The default used whenever a lookup cannot be completed.
    pub fn safe_default() -> Self {
        Self::default()
    }

    pub fn is_mintable(&self) -> bool {
        self.mint_authority.is_some()
    }

    pub fn is_freezable(&self) -> bool {
        self.freeze_authority.is_some()
    }
}

/// On-chain mint security lookup.
#[async_trait]
pub trait TokenSecurityPort: Send + Sync {
    /// Fetch authority flags for a mint. Never fails; lookups that cannot
    /// complete return `MintSecurity::safe_default()` as a fallback.
    async fn mint_security(&self, mint: &str) -> Sourced<MintSecurity>;
}
