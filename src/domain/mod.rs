//! Domain Layer - Core screening logic
//!
//! Pure types and functions with no I/O:
//! - `pair`: wire model for pair snapshots plus numeric-coercion accessors
//! - `ranking`: dedupe / filter / sort / rarity / verification tagging
//! - `risk`: heuristic band-rule risk scorer
//! - `verified`: curated allow-list registry
//!
//! External interactions happen through the ports layer.

pub mod pair;
pub mod ranking;
pub mod risk;
pub mod verified;

pub use pair::{LockStatus, PairSnapshot, TokenInfo};
pub use ranking::{
    apply_filters, apply_sort, chain_pairs, decorate, dedupe_best_per_token, PairFilters,
    QuotePreference, RankedPair, Rarity, SortKey,
};
pub use risk::{compute_risk, RiskAssessment, RiskFlags, RiskInput, RiskLabel};
pub use verified::VerifiedRegistry;
