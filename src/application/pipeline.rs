//! Security & Risk Annotation Pipeline
//!
//! Joins ranked pairs against on-chain mint security: unique base mints
//! are collected in first-seen order, looked up concurrently, and joined
//! back by address. Pairs whose mint can still mint or freeze are dropped
//! outright; survivors get the liquidity-lock tri-state and a risk score.
//! Surviving pairs keep their input order - filtering is the only
//! list-length-changing operation here.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::pair::LockStatus;
use crate::domain::ranking::RankedPair;
use crate::domain::risk::{compute_risk, RiskAssessment, RiskFlags, RiskInput};
use crate::ports::security::{MintSecurity, TokenSecurityPort};

/// Fully decorated pair, ready for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedPair {
    #[serde(flatten)]
    pub ranked: RankedPair,
    /// Always false for survivors; kept in the payload so consumers see
    /// the checked-and-clear state rather than an absent field.
    pub mintable: bool,
    pub freezable: bool,
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
    pub liquidity_locked: LockStatus,
    pub risk: RiskAssessment,
}

impl AnnotatedPair {
    pub fn base_address(&self) -> &str {
        self.ranked.snapshot.base_address()
    }

    pub fn liquidity_usd(&self) -> f64 {
        self.ranked.liquidity_usd
    }
}

/// Concurrently resolve security info for every unique base mint.
/// The map is keyed by address, so completion order never matters.
async fn security_map(
    pairs: &[RankedPair],
    security: &dyn TokenSecurityPort,
) -> HashMap<String, MintSecurity> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = Vec::new();
    for pair in pairs {
        let base = pair.snapshot.base_address();
        if !base.is_empty() && seen.insert(base.to_string()) {
            unique.push(base.to_string());
        }
    }

    let lookups = join_all(unique.iter().map(|mint| security.mint_security(mint))).await;

    unique
        .into_iter()
        .zip(lookups.into_iter().map(|s| s.into_value()))
        .collect()
}

/// Annotate pairs with security flags, lock status, and risk.
///
/// `now_ms` is the request's wall clock, threaded through to the scorer's
/// age bands.
pub async fn annotate_pairs(
    pairs: Vec<RankedPair>,
    security: &dyn TokenSecurityPort,
    now_ms: i64,
) -> Vec<AnnotatedPair> {
    if pairs.is_empty() {
        return Vec::new();
    }

    let sec_map = security_map(&pairs, security).await;

    pairs
        .into_iter()
        .filter_map(|ranked| {
            let sec = sec_map
                .get(ranked.snapshot.base_address())
                .cloned()
                .unwrap_or_default();

            // Mintable or freezable supply is an immediate disqualifier.
            if sec.is_mintable() || sec.is_freezable() {
                debug!(
                    mint = ranked.snapshot.base_address(),
                    mintable = sec.is_mintable(),
                    freezable = sec.is_freezable(),
                    "dropping pair with live mint authority"
                );
                return None;
            }

            let liquidity_locked = ranked.snapshot.liquidity_lock_status();
            let flags = RiskFlags {
                verified: ranked.verified,
                mintable: sec.is_mintable(),
                freezable: sec.is_freezable(),
                liquidity_locked,
            };
            let risk = compute_risk(&RiskInput::from_snapshot(&ranked.snapshot), &flags, now_ms);

            Some(AnnotatedPair {
                mintable: sec.is_mintable(),
                freezable: sec.is_freezable(),
                mint_authority: sec.mint_authority,
                freeze_authority: sec.freeze_authority,
                liquidity_locked,
                risk,
                ranked,
            })
        })
        .collect()
}

/// Highest-liquidity pair, or None for an empty list.
pub fn pick_best_by_liquidity(pairs: &[AnnotatedPair]) -> Option<AnnotatedPair> {
    pairs
        .iter()
        .max_by(|a, b| a.liquidity_usd().total_cmp(&b.liquidity_usd()))
        .cloned()
}
