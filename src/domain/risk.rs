//! Heuristic Risk Scorer
//!
//! Pure scoring function: 0 = lowest risk, 100 = highest. Starts from a
//! baseline of 50 and sums independent band adjustments for liquidity,
//! volume, transaction count, pair age, and 24h price volatility, with a
//! flat discount for allow-listed tokens. Clamped once at the end.
//!
//! Each input has its own ordered rule table; the first matching rule wins
//! within a table and tables never interact, so every band is unit-testable
//! on its own.

use serde::{Deserialize, Serialize};

use super::pair::{LockStatus, PairSnapshot};

const BASELINE: i32 = 50;
const VERIFIED_DISCOUNT: i32 = 15;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// One threshold comparison within a rule table.
#[derive(Debug, Clone, Copy)]
enum Band {
    /// value >= threshold
    AtLeast(f64),
    /// value <= threshold
    AtMost(f64),
    /// value < threshold
    Below(f64),
    /// value > threshold
    Above(f64),
}

impl Band {
    fn matches(self, value: f64) -> bool {
        match self {
            Band::AtLeast(t) => value >= t,
            Band::AtMost(t) => value <= t,
            Band::Below(t) => value < t,
            Band::Above(t) => value > t,
        }
    }
}

/// First matching rule contributes its delta; later rules are skipped.
#[derive(Debug, Clone, Copy)]
struct BandRule {
    band: Band,
    delta: i32,
}

const fn rule(band: Band, delta: i32) -> BandRule {
    BandRule { band, delta }
}

const LIQUIDITY_BANDS: [BandRule; 5] = [
    rule(Band::AtLeast(10_000_000.0), -20),
    rule(Band::AtLeast(1_000_000.0), -10),
    rule(Band::AtLeast(200_000.0), -5),
    rule(Band::AtMost(25_000.0), 20),
    rule(Band::AtMost(75_000.0), 10),
];

const VOLUME_BANDS: [BandRule; 3] = [
    rule(Band::AtLeast(10_000_000.0), -10),
    rule(Band::AtLeast(1_000_000.0), -5),
    rule(Band::AtMost(25_000.0), 10),
];

const TXN_BANDS: [BandRule; 3] = [
    rule(Band::AtLeast(25_000.0), -10),
    rule(Band::AtLeast(5_000.0), -5),
    rule(Band::AtMost(200.0), 10),
];

/// Very new pairs are riskier; month-old pairs get a small discount.
const AGE_BANDS: [BandRule; 3] = [
    rule(Band::Below(6.0), 20),
    rule(Band::Below(24.0), 10),
    rule(Band::Above(24.0 * 30.0), -5),
];

/// Volatility proxy over the absolute 24h price change.
const VOLATILITY_BANDS: [BandRule; 2] = [
    rule(Band::AtLeast(100.0), 10),
    rule(Band::AtLeast(50.0), 5),
];

fn band_delta(value: f64, rules: &[BandRule]) -> i32 {
    rules
        .iter()
        .find(|r| r.band.matches(value))
        .map(|r| r.delta)
        .unwrap_or(0)
}

/// Market inputs to the scorer, already coerced (missing = 0).
#[derive(Debug, Clone, Default)]
pub struct RiskInput {
    pub liquidity_usd: f64,
    pub volume_h24: f64,
    pub txns_h24: u64,
    /// Epoch ms; zero or negative means the creation time is unknown and
    /// the age bands are skipped entirely.
    pub pair_created_at_ms: i64,
    pub price_change_h24: f64,
}

impl RiskInput {
    pub fn from_snapshot(pair: &PairSnapshot) -> Self {
        Self {
            liquidity_usd: pair.liquidity_usd(),
            volume_h24: pair.volume_h24(),
            txns_h24: pair.txns_h24(),
            pair_created_at_ms: pair.created_at_ms(),
            price_change_h24: pair.price_change_h24(),
        }
    }
}

/// Security-derived flags passed alongside the market inputs.
///
/// Only `verified` moves the score today. Mintable/freezable pairs are
/// dropped by the annotation pipeline before scoring, and the lock status
/// is surfaced to consumers without weighting, but all three stay in the
/// signature so the scorer can be exercised with them directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskFlags {
    pub verified: bool,
    pub mintable: bool,
    pub freezable: bool,
    pub liquidity_locked: LockStatus,
}

/// Risk label by ascending score cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLabel {
    fn from_score(score: u8) -> Self {
        match score {
            0..=25 => RiskLabel::Low,
            26..=55 => RiskLabel::Medium,
            56..=80 => RiskLabel::High,
            _ => RiskLabel::Extreme,
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLabel::Low => "Low",
            RiskLabel::Medium => "Medium",
            RiskLabel::High => "High",
            RiskLabel::Extreme => "Extreme",
        };
        f.write_str(s)
    }
}

/// Final score with its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub label: RiskLabel,
}

/// Score a pair. `now_ms` is the caller's wall clock, kept as a parameter
/// so age bands are deterministic under test.
pub fn compute_risk(input: &RiskInput, flags: &RiskFlags, now_ms: i64) -> RiskAssessment {
    let mut score = BASELINE;

    score += band_delta(input.liquidity_usd, &LIQUIDITY_BANDS);
    score += band_delta(input.volume_h24, &VOLUME_BANDS);
    score += band_delta(input.txns_h24 as f64, &TXN_BANDS);

    if input.pair_created_at_ms > 0 {
        let age_hours = ((now_ms - input.pair_created_at_ms).max(0)) as f64 / MS_PER_HOUR;
        score += band_delta(age_hours, &AGE_BANDS);
    }

    score += band_delta(input.price_change_h24.abs(), &VOLATILITY_BANDS);

    if flags.verified {
        score -= VERIFIED_DISCOUNT;
    }

    let score = score.clamp(0, 100) as u8;
    RiskAssessment {
        score,
        label: RiskLabel::from_score(score),
    }
}
