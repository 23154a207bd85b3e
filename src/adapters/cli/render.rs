//! Terminal Rendering
//!
//! Text formatting for the board output: compact dollar figures, short age
//! strings, signed percentages, and the board table itself. JSON output is
//! just the serialized pipeline payload.

use crate::application::pipeline::AnnotatedPair;
use crate::application::service::TokenOverview;
use crate::domain::pair::LockStatus;

/// Compact human number: 1.23B / 4.56M / 7.89k, integers below 1k,
/// sub-unit values with enough precision for micro-cap prices.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let raw = if abs >= 1_000_000_000.0 {
        format!("{:.2}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.2}k", value / 1_000.0)
    } else if abs >= 1.0 {
        return format!("{}", value as i64);
    } else if abs > 0.0 {
        format!("{value:.7}")
    } else {
        return "0".to_string();
    };
    raw.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Short age string from a creation timestamp: 45s, 12m, 3h, 5d, 2w, 6mo, 1y.
/// Unknown creation times render as "?".
pub fn format_age(created_ms: i64, now_ms: i64) -> String {
    if created_ms <= 0 {
        return "?".to_string();
    }
    let sec = ((now_ms - created_ms) / 1000).max(0);
    if sec < 60 {
        return format!("{sec}s");
    }
    let minutes = sec / 60;
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = minutes / 60;
    if hours < 48 {
        return format!("{hours}h");
    }
    let days = hours / 24;
    if days < 14 {
        return format!("{days}d");
    }
    let weeks = days / 7;
    if weeks < 9 {
        return format!("{weeks}w");
    }
    let months = days / 30;
    if months < 24 {
        return format!("{months}mo");
    }
    format!("{}y", days / 365)
}

/// Signed percentage, two decimals under 10%, one above.
pub fn format_pct(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    if value.abs() < 10.0 {
        format!("{sign}{value:.2}%")
    } else {
        format!("{sign}{value:.1}%")
    }
}

fn lock_marker(status: LockStatus) -> &'static str {
    match status {
        LockStatus::Locked => "locked",
        LockStatus::Unlocked => "unlocked",
        LockStatus::Unknown => "?",
    }
}

fn pair_row(pair: &AnnotatedPair, now_ms: i64) -> String {
    let snapshot = &pair.ranked.snapshot;
    let name = format!(
        "{}/{}",
        snapshot.base_token.symbol.as_deref().unwrap_or("?"),
        snapshot.quote_token.symbol.as_deref().unwrap_or("?")
    );
    let verified = if pair.ranked.verified { " *" } else { "" };
    format!(
        "{:<16} {:>12} {:>10} {:>10} {:>8} {:>5} {:>10} {:>8} {:>9}  {}",
        format!("{name}{verified}"),
        format_compact(snapshot.price_usd_value()),
        format_compact(pair.liquidity_usd()),
        format_compact(snapshot.volume_h24()),
        format_pct(snapshot.price_change_h24()),
        format_age(snapshot.created_at_ms(), now_ms),
        pair.ranked.rarity.to_string(),
        lock_marker(pair.liquidity_locked),
        format!("{} {}", pair.risk.score, pair.risk.label),
        snapshot.base_token.address,
    )
}

const HEADER: &str = "PAIR                    PRICE  LIQUIDITY    VOL 24H     24H%   AGE     RARITY     LIQ      RISK  MINT";

/// Render a board as an aligned table; `*` marks verified tokens.
pub fn render_board_text(pairs: &[AnnotatedPair], now_ms: i64) -> String {
    if pairs.is_empty() {
        return "No pairs matched.".to_string();
    }
    let mut out = String::from(HEADER);
    for pair in pairs {
        out.push('\n');
        out.push_str(&pair_row(pair, now_ms));
    }
    out
}

/// Render a per-token overview: the best venue, then every venue.
pub fn render_overview_text(overview: &TokenOverview, now_ms: i64) -> String {
    let mut out = String::new();
    match &overview.best {
        Some(best) => {
            let snapshot = &best.ranked.snapshot;
            out.push_str(&format!(
                "Best venue: {}/{} on {} (liquidity {}, risk {} {})\n\n",
                snapshot.base_token.symbol.as_deref().unwrap_or("?"),
                snapshot.quote_token.symbol.as_deref().unwrap_or("?"),
                snapshot.dex_id.as_deref().unwrap_or("?"),
                format_compact(best.liquidity_usd()),
                best.risk.score,
                best.risk.label,
            ));
        }
        None => out.push_str("No tradable venues found.\n\n"),
    }
    out.push_str(&render_board_text(&overview.pairs, now_ms));
    out
}
