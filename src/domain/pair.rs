//! Trading Pair Wire Model
//!
//! Serde types for DexScreener pair payloads plus the numeric-coercion
//! accessors the screening pipeline works against. Upstream fields are
//! inconsistently typed (numbers arrive as strings, sub-objects go missing),
//! so every numeric accessor coerces absent or malformed values to zero
//! instead of failing - a single bad record must never abort a whole page.

use serde::{Deserialize, Serialize};

/// Base or quote token of a pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Pooled liquidity sub-object.
///
/// The lock fields are not part of the documented schema but show up on
/// some aggregator mirrors; they feed the liquidity-locked tri-state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityInfo {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub base: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub quote: Option<f64>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub is_locked: Option<bool>,
    #[serde(default)]
    pub lock_status: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Per-horizon numeric stats (volume, price change).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowedStat {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub m5: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub h1: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub h6: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub h24: Option<f64>,
}

/// Buy/sell transaction counts for one horizon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxnCounts {
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    pub buys: Option<u64>,
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    pub sells: Option<u64>,
}

/// Transaction counts across horizons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxnWindows {
    #[serde(default)]
    pub m5: Option<TxnCounts>,
    #[serde(default)]
    pub h1: Option<TxnCounts>,
    #[serde(default)]
    pub h6: Option<TxnCounts>,
    #[serde(default)]
    pub h24: Option<TxnCounts>,
}

/// One token-to-quote trading venue snapshot as delivered upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSnapshot {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub dex_id: Option<String>,
    #[serde(default)]
    pub pair_address: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub base_token: TokenInfo,
    #[serde(default)]
    pub quote_token: TokenInfo,
    /// Upstream serializes the USD price as a string.
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub price_native: Option<String>,
    #[serde(default)]
    pub liquidity: Option<LiquidityInfo>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub fdv: Option<f64>,
    #[serde(default)]
    pub volume: Option<WindowedStat>,
    #[serde(default)]
    pub price_change: Option<WindowedStat>,
    #[serde(default)]
    pub txns: Option<TxnWindows>,
    /// Pair creation timestamp in epoch milliseconds.
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub pair_created_at: Option<i64>,
}

impl PairSnapshot {
    /// Base token mint address; empty string when the record carries none.
    pub fn base_address(&self) -> &str {
        &self.base_token.address
    }

    /// Quote token symbol, uppercased for preference matching.
    pub fn quote_symbol_upper(&self) -> String {
        self.quote_token
            .symbol
            .as_deref()
            .unwrap_or("")
            .to_uppercase()
    }

    /// Pooled liquidity in USD, 0 when missing.
    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity
            .as_ref()
            .and_then(|l| l.usd)
            .unwrap_or(0.0)
    }

    /// Market cap, falling back to fully diluted valuation, then 0.
    pub fn market_cap_or_fdv(&self) -> f64 {
        self.market_cap.or(self.fdv).unwrap_or(0.0)
    }

    /// 24h traded volume in USD, 0 when missing.
    pub fn volume_h24(&self) -> f64 {
        self.volume.as_ref().and_then(|v| v.h24).unwrap_or(0.0)
    }

    /// Total 24h transactions (buys + sells), 0 when missing.
    pub fn txns_h24(&self) -> u64 {
        self.txns
            .as_ref()
            .and_then(|t| t.h24.as_ref())
            .map(|c| c.buys.unwrap_or(0) + c.sells.unwrap_or(0))
            .unwrap_or(0)
    }

    /// 24h price change percentage, 0 when missing.
    pub fn price_change_h24(&self) -> f64 {
        self.price_change
            .as_ref()
            .and_then(|c| c.h24)
            .unwrap_or(0.0)
    }

    /// Creation timestamp in epoch ms, 0 when missing or unparseable.
    /// A zero here means "age unknown": age filters and age risk bands skip
    /// the pair rather than treating it as ancient.
    pub fn created_at_ms(&self) -> i64 {
        self.pair_created_at.unwrap_or(0)
    }

    /// USD price parsed from the upstream string, 0 when missing.
    pub fn price_usd_value(&self) -> f64 {
        self.price_usd
            .as_deref()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    /// Liquidity-locked tri-state. Explicit booleans win over status
    /// strings; anything unrecognized stays Unknown.
    pub fn liquidity_lock_status(&self) -> LockStatus {
        let Some(liq) = self.liquidity.as_ref() else {
            return LockStatus::Unknown;
        };
        if let Some(flag) = liq.locked.or(liq.is_locked) {
            return if flag {
                LockStatus::Locked
            } else {
                LockStatus::Unlocked
            };
        }
        let status = liq.lock_status.as_deref().or(liq.status.as_deref());
        match status.map(|s| s.to_lowercase()).as_deref() {
            Some("locked" | "lockedliquidity" | "locked_liquidity") => LockStatus::Locked,
            Some("unlocked" | "notlocked") => LockStatus::Unlocked,
            _ => LockStatus::Unknown,
        }
    }
}

/// Whether the pooled liquidity is known to be locked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockStatus {
    Locked,
    Unlocked,
    #[default]
    Unknown,
}

impl LockStatus {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            LockStatus::Locked => Some(true),
            LockStatus::Unlocked => Some(false),
            LockStatus::Unknown => None,
        }
    }
}

/// Lenient deserializers: accept numbers, numeric strings, or junk.
/// Junk becomes `None`, which the accessors then coerce to zero.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_to_f64))
    }

    pub fn u64_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(value_to_f64)
            .filter(|v| *v >= 0.0)
            .map(|v| v as u64))
    }

    pub fn i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(value_to_f64).map(|v| v as i64))
    }

    fn value_to_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}
