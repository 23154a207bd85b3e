//! DexScreener Response Shapes
//!
//! The pair endpoints wrap their list in `{"pairs": [...]}` while the
//! discovery endpoints have drifted between bare lists and assorted
//! wrapper objects across API revisions. Everything funnels through a
//! single normalizer, and individual rows that fail to decode are dropped
//! instead of failing the whole payload.

use serde_json::Value;
use tracing::debug;

use crate::domain::pair::PairSnapshot;
use crate::ports::market_data::TokenHighlight;

/// Wrapper keys seen on discovery endpoints.
const LIST_KEYS: [&str; 5] = ["data", "tokens", "profiles", "results", "items"];

/// Flatten the known payload shapes into a list of row objects.
pub fn normalize_list(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Object(ref map) => {
            for key in LIST_KEYS {
                if let Some(Value::Array(items)) = map.get(key) {
                    return items.clone();
                }
            }
            // A single object is treated as a one-row list.
            vec![data]
        }
        Value::Null => Vec::new(),
        _ => Vec::new(),
    }
}

/// Extract the pair list from a `{"pairs": [...]}` envelope.
pub fn pairs_from_envelope(data: Value) -> Vec<Value> {
    match data {
        Value::Object(mut map) => match map.remove("pairs") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Decode rows into pair snapshots, skipping the ones that do not decode.
pub fn decode_pairs(rows: Vec<Value>) -> Vec<PairSnapshot> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<PairSnapshot>(row) {
            Ok(pair) => Some(pair),
            Err(e) => {
                debug!(error = %e, "skipping undecodable pair row");
                None
            }
        })
        .collect()
}

/// Decode discovery rows, skipping undecodable ones.
pub fn decode_highlights(rows: Vec<Value>) -> Vec<TokenHighlight> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<TokenHighlight>(row) {
            Ok(highlight) => Some(highlight),
            Err(e) => {
                debug!(error = %e, "skipping undecodable discovery row");
                None
            }
        })
        .collect()
}
