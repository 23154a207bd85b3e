//! DexScreener API Client
//!
//! HTTP client for the DexScreener pair and discovery endpoints. Raw
//! payloads are cached briefly to keep repeated dashboard loads from
//! hammering the API. Every upstream failure is absorbed: logged, then
//! substituted with an empty fallback so a dead upstream renders as an
//! empty board, never as an error page.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::domain::pair::PairSnapshot;
use crate::ports::market_data::{MarketDataPort, Sourced, TokenHighlight};

use super::types::{decode_highlights, decode_pairs, normalize_list, pairs_from_envelope};

/// Batch endpoint limit: at most 30 comma-joined addresses per request.
const BATCH_LIMIT: usize = 30;

/// Client errors (internal; the port surface absorbs them)
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

/// DexScreener client configuration
#[derive(Debug, Clone)]
pub struct DexScreenerConfig {
    /// API base URL
    pub api_url: String,
    /// Chain the discovery feeds are filtered to
    pub chain_id: String,
    /// Request timeout
    pub timeout: Duration,
    /// TTL for raw pair payloads (search, per-token)
    pub raw_pairs_ttl: Duration,
    /// TTL for raw discovery payloads (profiles, boosts)
    pub discovery_ttl: Duration,
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.dexscreener.com".to_string(),
            chain_id: "solana".to_string(),
            timeout: Duration::from_secs(12),
            raw_pairs_ttl: Duration::from_secs(20),
            discovery_ttl: Duration::from_secs(60),
        }
    }
}

impl DexScreenerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_url: config.dexscreener.api_url.clone(),
            chain_id: config.screen.chain_id.clone(),
            timeout: Duration::from_secs(config.dexscreener.timeout_secs),
            raw_pairs_ttl: Duration::from_secs(config.cache.raw_pairs_ttl_secs),
            discovery_ttl: Duration::from_secs(config.cache.discovery_ttl_secs),
        }
    }
}

/// DexScreener pair and discovery client
#[derive(Debug, Clone)]
pub struct DexScreenerClient {
    config: DexScreenerConfig,
    http: Client,
    pairs_cache: Arc<Mutex<TtlCache<Vec<PairSnapshot>>>>,
    discovery_cache: Arc<Mutex<TtlCache<Vec<TokenHighlight>>>>,
}

impl DexScreenerClient {
    pub fn new(config: DexScreenerConfig) -> Result<Self, MarketDataError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http,
            pairs_cache: Arc::new(Mutex::new(TtlCache::new())),
            discovery_cache: Arc::new(Mutex::new(TtlCache::new())),
        })
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, MarketDataError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(MarketDataError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    /// Fetch a `{"pairs": [...]}` endpoint through the raw-pairs cache.
    async fn cached_pairs(&self, cache_key: &str, url: &str) -> Sourced<Vec<PairSnapshot>> {
        {
            let mut cache = self.pairs_cache.lock().await;
            if let Some(pairs) = cache.get(cache_key) {
                debug!(key = cache_key, "pairs cache hit");
                return Sourced::cached(pairs);
            }
        }

        let (pairs, sourced) = match self.get_json(url).await {
            Ok(data) => {
                let pairs = decode_pairs(pairs_from_envelope(data));
                (pairs.clone(), Sourced::upstream(pairs))
            }
            Err(e) => {
                warn!(url, error = %e, "pair fetch failed, substituting empty list");
                (Vec::new(), Sourced::fallback(Vec::new()))
            }
        };

        // The empty fallback is cached too, so a dead upstream is not
        // re-polled on every page load within the TTL.
        self.pairs_cache
            .lock()
            .await
            .set(cache_key, pairs, self.config.raw_pairs_ttl);
        sourced
    }

    /// Fetch a discovery feed through the discovery cache, filtered to the
    /// configured chain (case-insensitive, the feeds are not consistent).
    async fn cached_discovery(&self, cache_key: &str, url: &str) -> Sourced<Vec<TokenHighlight>> {
        {
            let mut cache = self.discovery_cache.lock().await;
            if let Some(rows) = cache.get(cache_key) {
                debug!(key = cache_key, "discovery cache hit");
                return Sourced::cached(rows);
            }
        }

        let chain = self.config.chain_id.to_lowercase();
        let (rows, sourced) = match self.get_json(url).await {
            Ok(data) => {
                let rows: Vec<TokenHighlight> = decode_highlights(normalize_list(data))
                    .into_iter()
                    .filter(|h| h.chain_id.to_lowercase() == chain)
                    .collect();
                (rows.clone(), Sourced::upstream(rows))
            }
            Err(e) => {
                warn!(url, error = %e, "discovery fetch failed, substituting empty list");
                (Vec::new(), Sourced::fallback(Vec::new()))
            }
        };

        self.discovery_cache
            .lock()
            .await
            .set(cache_key, rows, self.config.discovery_ttl);
        sourced
    }
}

/// Join up to `BATCH_LIMIT` non-empty addresses for the batch endpoint.
fn batch_segment(token_addresses: &[String]) -> Option<String> {
    let kept: Vec<&str> = token_addresses
        .iter()
        .map(String::as_str)
        .filter(|a| !a.is_empty())
        .take(BATCH_LIMIT)
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(","))
    }
}

#[async_trait]
impl MarketDataPort for DexScreenerClient {
    async fn search(&self, query: &str) -> Sourced<Vec<PairSnapshot>> {
        let query = query.trim();
        if query.is_empty() {
            return Sourced::upstream(Vec::new());
        }
        let cache_key = format!("dex:search:{}", query.to_lowercase());
        let url = format!(
            "{}/latest/dex/search?q={}",
            self.config.api_url,
            urlencode(query)
        );
        self.cached_pairs(&cache_key, &url).await
    }

    async fn pairs_for_token(&self, token_address: &str) -> Sourced<Vec<PairSnapshot>> {
        let address = token_address.trim();
        if address.is_empty() {
            return Sourced::upstream(Vec::new());
        }
        let cache_key = format!("dex:token:{address}");
        let url = format!("{}/latest/dex/tokens/{address}", self.config.api_url);
        self.cached_pairs(&cache_key, &url).await
    }

    async fn pairs_for_tokens(&self, token_addresses: &[String]) -> Sourced<Vec<PairSnapshot>> {
        let Some(joined) = batch_segment(token_addresses) else {
            return Sourced::upstream(Vec::new());
        };
        let url = format!(
            "{}/tokens/v1/{}/{joined}",
            self.config.api_url, self.config.chain_id
        );
        match self.get_json(&url).await {
            Ok(data) => Sourced::upstream(decode_pairs(normalize_list(data))),
            Err(e) => {
                warn!(url, error = %e, "batch pair fetch failed, substituting empty list");
                Sourced::fallback(Vec::new())
            }
        }
    }

    async fn latest_profiles(&self) -> Sourced<Vec<TokenHighlight>> {
        let url = format!("{}/token-profiles/latest/v1", self.config.api_url);
        self.cached_discovery("dex:profiles:latest", &url).await
    }

    async fn top_boosted(&self) -> Sourced<Vec<TokenHighlight>> {
        let url = format!("{}/token-boosts/top/v1", self.config.api_url);
        self.cached_discovery("dex:boosts:top", &url).await
    }
}

/// Minimal query-string escaping for the search term.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
