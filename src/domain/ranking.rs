//! Pair Selection & Ranking
//!
//! Turns a raw list of pair snapshots into a bounded, deduplicated,
//! ordered list ready for annotation: chain filter, best-pair-per-token
//! dedupe with quote-preference tie-breaking, liquidity/volume/age
//! filters, comparator sorts, rarity tiers, and verification tagging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::pair::PairSnapshot;
use super::verified::VerifiedRegistry;

/// Rank assigned to quote symbols absent from the preference list; always
/// loses against any listed symbol.
const UNRANKED: usize = usize::MAX;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Cosmetic liquidity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Legendary,
    Epic,
    Rare,
    Common,
}

impl Rarity {
    /// Thresholds are inclusive at the lower bound.
    pub fn from_liquidity(liquidity_usd: f64) -> Self {
        if liquidity_usd >= 10_000_000.0 {
            Rarity::Legendary
        } else if liquidity_usd >= 1_000_000.0 {
            Rarity::Epic
        } else if liquidity_usd >= 100_000.0 {
            Rarity::Rare
        } else {
            Rarity::Common
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rarity::Legendary => "legendary",
            Rarity::Epic => "epic",
            Rarity::Rare => "rare",
            Rarity::Common => "common",
        };
        f.write_str(s)
    }
}

/// Ordered list of preferred quote symbols, best first.
#[derive(Debug, Clone)]
pub struct QuotePreference {
    symbols: Vec<String>,
}

impl Default for QuotePreference {
    fn default() -> Self {
        Self::new(["USDC", "USDT", "SOL"])
    }
}

impl QuotePreference {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols
                .into_iter()
                .map(|s| s.into().to_uppercase())
                .collect(),
        }
    }

    /// Position in the preference list; unlisted symbols get the sentinel
    /// rank and lose every tie.
    pub fn rank(&self, quote_symbol: &str) -> usize {
        let upper = quote_symbol.to_uppercase();
        self.symbols
            .iter()
            .position(|s| *s == upper)
            .unwrap_or(UNRANKED)
    }
}

/// A pair that survived dedupe, carrying its derived display attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPair {
    #[serde(flatten)]
    pub snapshot: PairSnapshot,
    /// Cached so comparators do not re-walk the liquidity sub-object.
    pub liquidity_usd: f64,
    pub rarity: Rarity,
    pub verified: bool,
}

/// Attach the derived attributes to a snapshot.
pub fn decorate(snapshot: PairSnapshot, registry: &VerifiedRegistry) -> RankedPair {
    let liquidity_usd = snapshot.liquidity_usd();
    let verified = registry.contains_mint(snapshot.base_address());
    RankedPair {
        liquidity_usd,
        rarity: Rarity::from_liquidity(liquidity_usd),
        verified,
        snapshot,
    }
}

/// Retain only pairs on the target chain (exact string match).
pub fn chain_pairs(pairs: Vec<PairSnapshot>, chain_id: &str) -> Vec<PairSnapshot> {
    pairs.into_iter().filter(|p| p.chain_id == chain_id).collect()
}

/// Keep the single best venue per base token.
///
/// Best = highest liquidity, ties broken by quote-preference rank. The
/// result is ordered by (liquidity desc, preference rank asc) and capped
/// at `limit`. Pairs without a base address are dropped.
pub fn dedupe_best_per_token(
    pairs: Vec<PairSnapshot>,
    prefs: &QuotePreference,
    registry: &VerifiedRegistry,
    limit: usize,
) -> Vec<RankedPair> {
    let mut best_by_token: HashMap<String, (RankedPair, usize)> = HashMap::new();

    for snapshot in pairs {
        let base = snapshot.base_address().to_string();
        if base.is_empty() {
            continue;
        }
        let rank = prefs.rank(&snapshot.quote_symbol_upper());
        let candidate = decorate(snapshot, registry);

        match best_by_token.get(&base) {
            None => {
                best_by_token.insert(base, (candidate, rank));
            }
            Some((held, held_rank)) => {
                let better = candidate.liquidity_usd > held.liquidity_usd
                    || (candidate.liquidity_usd == held.liquidity_usd && rank < *held_rank);
                if better {
                    best_by_token.insert(base, (candidate, rank));
                }
            }
        }
    }

    let mut result: Vec<(RankedPair, usize)> = best_by_token.into_values().collect();
    result.sort_by(|(a, a_rank), (b, b_rank)| {
        b.liquidity_usd
            .total_cmp(&a.liquidity_usd)
            .then(a_rank.cmp(b_rank))
    });
    result.truncate(limit);
    result.into_iter().map(|(pair, _)| pair).collect()
}

/// Display filters applied after dedupe.
#[derive(Debug, Clone, Default)]
pub struct PairFilters {
    pub min_liquidity_usd: f64,
    pub min_volume_usd: f64,
    /// When set, pairs older than this are dropped. Pairs with no creation
    /// timestamp cannot be aged and are never dropped by this filter.
    pub max_age_hours: Option<f64>,
}

pub fn apply_filters(pairs: Vec<RankedPair>, filters: &PairFilters, now_ms: i64) -> Vec<RankedPair> {
    pairs
        .into_iter()
        .filter(|p| {
            if p.liquidity_usd < filters.min_liquidity_usd {
                return false;
            }
            if p.snapshot.volume_h24() < filters.min_volume_usd {
                return false;
            }
            if let Some(max_age) = filters.max_age_hours.filter(|h| *h > 0.0) {
                let created = p.snapshot.created_at_ms();
                if created > 0 {
                    let age_hours = (now_ms - created) as f64 / MS_PER_HOUR;
                    if age_hours > max_age {
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}

/// Display sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Liquidity,
    MarketCap,
    Volume,
    /// Newest pairs first.
    Age,
    PriceChange,
    Txns,
}

impl SortKey {
    /// Parse the short UI keys; anything unrecognized falls back to the
    /// liquidity sort, mirroring the upstream behavior.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "mcap" => SortKey::MarketCap,
            "vol" => SortKey::Volume,
            "age" => SortKey::Age,
            "h24" => SortKey::PriceChange,
            "txns" => SortKey::Txns,
            _ => SortKey::Liquidity,
        }
    }
}

/// Stable descending sort by the selected key.
pub fn apply_sort(pairs: &mut [RankedPair], key: SortKey) {
    match key {
        SortKey::Liquidity => {
            pairs.sort_by(|a, b| b.liquidity_usd.total_cmp(&a.liquidity_usd));
        }
        SortKey::MarketCap => pairs.sort_by(|a, b| {
            b.snapshot
                .market_cap_or_fdv()
                .total_cmp(&a.snapshot.market_cap_or_fdv())
        }),
        SortKey::Volume => pairs.sort_by(|a, b| {
            b.snapshot.volume_h24().total_cmp(&a.snapshot.volume_h24())
        }),
        SortKey::Age => {
            pairs.sort_by(|a, b| b.snapshot.created_at_ms().cmp(&a.snapshot.created_at_ms()));
        }
        SortKey::PriceChange => pairs.sort_by(|a, b| {
            b.snapshot
                .price_change_h24()
                .total_cmp(&a.snapshot.price_change_h24())
        }),
        SortKey::Txns => {
            pairs.sort_by(|a, b| b.snapshot.txns_h24().cmp(&a.snapshot.txns_h24()));
        }
    }
}
