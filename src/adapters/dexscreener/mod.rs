//! DexScreener Adapter
//!
//! Implements `MarketDataPort` against the public DexScreener API: pair
//! search, per-token listings, batch lookups, and the discovery feeds
//! (latest profiles, top boosts).

pub mod client;
pub mod types;

pub use client::{DexScreenerClient, DexScreenerConfig, MarketDataError};
