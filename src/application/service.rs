//! Token Board Service
//!
//! Wires the market data and security ports, the verified registry, and
//! the response caches into the request pipelines behind every dashboard
//! surface: search, the discovery boards, per-token overviews, and the
//! watchlist best-pair lookup.
//!
//! Shape of every board: fetch raw pairs -> chain filter -> dedupe best
//! venue per token -> display filters -> sort -> cap -> security/risk
//! annotation -> cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::domain::pair::PairSnapshot;
use crate::domain::ranking::{
    apply_filters, apply_sort, chain_pairs, decorate, dedupe_best_per_token, PairFilters,
    QuotePreference, SortKey,
};
use crate::domain::verified::VerifiedRegistry;
use crate::ports::market_data::MarketDataPort;
use crate::ports::security::TokenSecurityPort;

use super::pipeline::{annotate_pairs, pick_best_by_liquidity, AnnotatedPair};

/// Dedupe pool / display cap per board.
const SEARCH_POOL: usize = 80;
const SEARCH_CAP: usize = 36;
const TRENDING_POOL: usize = 120;
const TRENDING_CAP: usize = 48;
const LATEST_POOL: usize = 200;
const LATEST_CAP: usize = 36;
const VERIFIED_POOL: usize = 80;
const VERIFIED_CAP: usize = 36;
/// Venue list cap on the per-token overview.
const OVERVIEW_CAP: usize = 25;
/// Most addresses accepted by one best-pairs call.
const BEST_BATCH_CAP: usize = 60;

/// Per-request screening options.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub sort: SortKey,
    pub min_liquidity_usd: f64,
    pub min_volume_usd: f64,
    pub max_age_hours: Option<f64>,
    /// Overrides the configured quote preference when set.
    pub quote_preference: Option<Vec<String>>,
}

impl ListQuery {
    /// Composite cache-key segment encoding every parameter that changes
    /// the shaped result.
    fn cache_suffix(&self) -> String {
        let quote = self
            .quote_preference
            .as_ref()
            .map(|q| q.join("+"))
            .unwrap_or_default();
        format!(
            "{quote}:{:?}:{}:{}:{}",
            self.sort,
            self.min_liquidity_usd,
            self.min_volume_usd,
            self.max_age_hours.unwrap_or(0.0)
        )
    }

    fn filters(&self) -> PairFilters {
        PairFilters {
            min_liquidity_usd: self.min_liquidity_usd,
            min_volume_usd: self.min_volume_usd,
            max_age_hours: self.max_age_hours,
        }
    }
}

/// Per-token overview: the best venue plus every venue, liquidity-ranked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenOverview {
    pub best: Option<AnnotatedPair>,
    pub pairs: Vec<AnnotatedPair>,
}

/// Service configuration distilled from the app config.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub chain_id: String,
    pub quote_default: Vec<String>,
    pub search_ttl: Duration,
    pub list_ttl: Duration,
    pub token_ttl: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            chain_id: "solana".to_string(),
            quote_default: vec![
                "USDC".to_string(),
                "USDT".to_string(),
                "SOL".to_string(),
            ],
            search_ttl: Duration::from_secs(15),
            list_ttl: Duration::from_secs(20),
            token_ttl: Duration::from_secs(20),
        }
    }
}

impl BoardConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chain_id: config.screen.chain_id.clone(),
            quote_default: config.screen.quote_preference.clone(),
            search_ttl: Duration::from_secs(config.cache.search_ttl_secs),
            list_ttl: Duration::from_secs(config.cache.list_ttl_secs),
            token_ttl: Duration::from_secs(config.cache.token_ttl_secs),
        }
    }
}

/// The pipeline facade consumed by the presentation layer.
pub struct TokenBoardService {
    market: Arc<dyn MarketDataPort>,
    security: Arc<dyn TokenSecurityPort>,
    registry: VerifiedRegistry,
    config: BoardConfig,
    board_cache: Arc<Mutex<TtlCache<Vec<AnnotatedPair>>>>,
    overview_cache: Arc<Mutex<TtlCache<TokenOverview>>>,
    best_cache: Arc<Mutex<TtlCache<Option<AnnotatedPair>>>>,
}

impl TokenBoardService {
    pub fn new(
        market: Arc<dyn MarketDataPort>,
        security: Arc<dyn TokenSecurityPort>,
        registry: VerifiedRegistry,
        config: BoardConfig,
    ) -> Self {
        info!(
            chain = %config.chain_id,
            verified = registry.len(),
            "token board service ready"
        );
        Self {
            market,
            security,
            registry,
            config,
            board_cache: Arc::new(Mutex::new(TtlCache::new())),
            overview_cache: Arc::new(Mutex::new(TtlCache::new())),
            best_cache: Arc::new(Mutex::new(TtlCache::new())),
        }
    }

    fn quote_preference(&self, query: &ListQuery) -> QuotePreference {
        match &query.quote_preference {
            Some(symbols) => QuotePreference::new(symbols.clone()),
            None => QuotePreference::new(self.config.quote_default.clone()),
        }
    }

    /// The shared board pipeline from raw snapshots to annotated pairs.
    async fn shape(
        &self,
        raw: Vec<PairSnapshot>,
        query: &ListQuery,
        pool: usize,
        cap: usize,
    ) -> Vec<AnnotatedPair> {
        let now_ms = Utc::now().timestamp_millis();
        let prefs = self.quote_preference(query);

        let on_chain = chain_pairs(raw, &self.config.chain_id);
        let mut best = dedupe_best_per_token(on_chain, &prefs, &self.registry, pool);
        best = apply_filters(best, &query.filters(), now_ms);
        apply_sort(&mut best, query.sort);
        best.truncate(cap);

        annotate_pairs(best, self.security.as_ref(), now_ms).await
    }

    async fn cached_board(&self, key: &str) -> Option<Vec<AnnotatedPair>> {
        let hit = self.board_cache.lock().await.get(key);
        if hit.is_some() {
            debug!(key, "board cache hit");
        }
        hit
    }

    /// Free-text search board.
    pub async fn search(&self, query_text: &str, query: &ListQuery) -> Vec<AnnotatedPair> {
        let query_text = query_text.trim();
        if query_text.is_empty() {
            return Vec::new();
        }

        let key = format!("search:{query_text}:{}", query.cache_suffix());
        if let Some(board) = self.cached_board(&key).await {
            return board;
        }

        let raw = self.market.search(query_text).await.into_value();
        let board = self.shape(raw, query, SEARCH_POOL, SEARCH_CAP).await;

        self.board_cache
            .lock()
            .await
            .set(key, board.clone(), self.config.search_ttl);
        board
    }

    /// Trending board built from the top boosted tokens.
    pub async fn trending(&self, query: &ListQuery) -> Vec<AnnotatedPair> {
        let key = format!("disc:trending:{}", query.cache_suffix());
        if let Some(board) = self.cached_board(&key).await {
            return board;
        }

        let boosted = self.market.top_boosted().await.into_value();
        let addresses: Vec<String> = boosted
            .into_iter()
            .map(|h| h.token_address)
            .filter(|a| !a.is_empty())
            .collect();
        let raw = self.market.pairs_for_tokens(&addresses).await.into_value();
        let board = self.shape(raw, query, TRENDING_POOL, TRENDING_CAP).await;

        self.board_cache
            .lock()
            .await
            .set(key, board.clone(), self.config.list_ttl);
        board
    }

    /// Newly listed board built from the latest token profiles.
    pub async fn newly_listed(&self, query: &ListQuery) -> Vec<AnnotatedPair> {
        let key = format!("disc:latest:{}", query.cache_suffix());
        if let Some(board) = self.cached_board(&key).await {
            return board;
        }

        let profiles = self.market.latest_profiles().await.into_value();
        let addresses: Vec<String> = profiles
            .into_iter()
            .map(|h| h.token_address)
            .filter(|a| !a.is_empty())
            .collect();
        let raw = self.market.pairs_for_tokens(&addresses).await.into_value();
        let board = self.shape(raw, query, LATEST_POOL, LATEST_CAP).await;

        self.board_cache
            .lock()
            .await
            .set(key, board.clone(), self.config.list_ttl);
        board
    }

    /// Board of the curated allow-list tokens.
    pub async fn verified_board(&self, query: &ListQuery) -> Vec<AnnotatedPair> {
        let key = format!("disc:verified:{}", query.cache_suffix());
        if let Some(board) = self.cached_board(&key).await {
            return board;
        }

        let addresses = self.registry.mints();
        let raw = self.market.pairs_for_tokens(&addresses).await.into_value();
        let board = self.shape(raw, query, VERIFIED_POOL, VERIFIED_CAP).await;

        self.board_cache
            .lock()
            .await
            .set(key, board.clone(), self.config.list_ttl);
        board
    }

    /// Every venue for one token, annotated, with the best venue pulled
    /// out. No dedupe here - the venue list is the point.
    pub async fn token_overview(&self, token_address: &str) -> TokenOverview {
        let token_address = token_address.trim();
        let key = format!("coin:{token_address}");
        if let Some(overview) = self.overview_cache.lock().await.get(&key) {
            debug!(key = %key, "overview cache hit");
            return overview;
        }

        let now_ms = Utc::now().timestamp_millis();
        let raw = self.market.pairs_for_token(token_address).await.into_value();
        let on_chain = chain_pairs(raw, &self.config.chain_id);
        let ranked: Vec<_> = on_chain
            .into_iter()
            .map(|p| decorate(p, &self.registry))
            .collect();

        let mut pairs = annotate_pairs(ranked, self.security.as_ref(), now_ms).await;
        pairs.sort_by(|a, b| b.liquidity_usd().total_cmp(&a.liquidity_usd()));
        let best = pairs.first().cloned();
        pairs.truncate(OVERVIEW_CAP);

        let overview = TokenOverview { best, pairs };
        self.overview_cache
            .lock()
            .await
            .set(key, overview.clone(), self.config.token_ttl);
        overview
    }

    /// Best venue per requested token, liquidity-ranked. Tokens whose
    /// lookup comes back empty (or entirely excluded) are skipped.
    pub async fn best_pairs(&self, token_addresses: &[String]) -> Vec<AnnotatedPair> {
        let now_ms = Utc::now().timestamp_millis();
        let mut out: Vec<AnnotatedPair> = Vec::new();

        for address in token_addresses.iter().take(BEST_BATCH_CAP) {
            let key = format!("best:{address}");
            let cached = self.best_cache.lock().await.get(&key);
            let best = match cached {
                Some(best) => best,
                None => {
                    let raw = self.market.pairs_for_token(address).await.into_value();
                    let on_chain = chain_pairs(raw, &self.config.chain_id);
                    let ranked: Vec<_> = on_chain
                        .into_iter()
                        .map(|p| decorate(p, &self.registry))
                        .collect();
                    let annotated =
                        annotate_pairs(ranked, self.security.as_ref(), now_ms).await;
                    let best = pick_best_by_liquidity(&annotated);
                    self.best_cache
                        .lock()
                        .await
                        .set(key, best.clone(), self.config.token_ttl);
                    best
                }
            };
            if let Some(best) = best {
                out.push(best);
            }
        }

        out.sort_by(|a, b| b.liquidity_usd().total_cmp(&a.liquidity_usd()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pair::{LiquidityInfo, TokenInfo};
    use crate::ports::market_data::TokenHighlight;
    use crate::ports::mocks::{MockMarketData, MockTokenSecurity};

    fn snapshot(base: &str, quote: &str, liquidity: f64) -> PairSnapshot {
        PairSnapshot {
            chain_id: "solana".to_string(),
            base_token: TokenInfo {
                address: base.to_string(),
                symbol: Some(base.to_string()),
                name: None,
            },
            quote_token: TokenInfo {
                address: format!("{quote}-mint"),
                symbol: Some(quote.to_string()),
                name: None,
            },
            liquidity: Some(LiquidityInfo {
                usd: Some(liquidity),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn service_with(
        market: MockMarketData,
        security: MockTokenSecurity,
    ) -> (TokenBoardService, Arc<MockMarketData>, Arc<MockTokenSecurity>) {
        let market = Arc::new(market);
        let security = Arc::new(security);
        let service = TokenBoardService::new(
            market.clone(),
            security.clone(),
            VerifiedRegistry::from_entries([("GOOD", "good-mint")]),
            BoardConfig::default(),
        );
        (service, market, security)
    }

    #[tokio::test]
    async fn test_search_pipeline_dedupes_and_annotates() {
        let market = MockMarketData::new().with_search(
            "tok",
            vec![
                snapshot("tok", "USDT", 500.0),
                snapshot("tok", "USDC", 1_500.0),
                snapshot("tok", "SOL", 1_500.0),
            ],
        );
        let (service, _, _) = service_with(market, MockTokenSecurity::new());

        let board = service.search("tok", &ListQuery::default()).await;

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].ranked.snapshot.quote_symbol_upper(), "USDC");
        assert_eq!(board[0].liquidity_usd(), 1_500.0);
    }

    #[tokio::test]
    async fn test_search_results_are_cached() {
        let market = MockMarketData::new().with_search("tok", vec![snapshot("tok", "USDC", 10.0)]);
        let (service, market, _) = service_with(market, MockTokenSecurity::new());

        let query = ListQuery::default();
        service.search("tok", &query).await;
        service.search("tok", &query).await;

        // Second call must be served from the board cache.
        assert_eq!(market.get_calls(), vec!["search:tok"]);
    }

    #[tokio::test]
    async fn test_different_query_options_miss_the_cache() {
        let market = MockMarketData::new().with_search("tok", vec![snapshot("tok", "USDC", 10.0)]);
        let (service, market, _) = service_with(market, MockTokenSecurity::new());

        service.search("tok", &ListQuery::default()).await;
        service
            .search(
                "tok",
                &ListQuery {
                    min_liquidity_usd: 5.0,
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(market.get_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_search_is_a_no_op() {
        let (service, market, _) =
            service_with(MockMarketData::new(), MockTokenSecurity::new());
        let board = service.search("   ", &ListQuery::default()).await;
        assert!(board.is_empty());
        assert!(market.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_trending_feeds_batch_with_boosted_addresses() {
        let market = MockMarketData::new()
            .with_boosted(vec![
                TokenHighlight {
                    token_address: "aaa".to_string(),
                    chain_id: "solana".to_string(),
                    ..Default::default()
                },
                TokenHighlight {
                    token_address: "bbb".to_string(),
                    chain_id: "solana".to_string(),
                    ..Default::default()
                },
            ])
            .with_batch(vec![
                snapshot("aaa", "USDC", 100.0),
                snapshot("bbb", "USDC", 200.0),
            ]);
        let (service, market, _) = service_with(market, MockTokenSecurity::new());

        let board = service.trending(&ListQuery::default()).await;

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].base_address(), "bbb");
        assert_eq!(market.get_calls(), vec!["boosted", "batch:aaa,bbb"]);
    }

    #[tokio::test]
    async fn test_failed_upstream_renders_empty_board() {
        let (service, _, _) = service_with(MockMarketData::failing(), MockTokenSecurity::new());
        let board = service.trending(&ListQuery::default()).await;
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_token_overview_ranks_venues_and_picks_best() {
        let market = MockMarketData::new().with_token_pairs(
            "tok",
            vec![
                snapshot("tok", "USDT", 100.0),
                snapshot("tok", "USDC", 900.0),
                snapshot("tok", "SOL", 400.0),
            ],
        );
        let (service, _, _) = service_with(market, MockTokenSecurity::new());

        let overview = service.token_overview("tok").await;

        assert_eq!(overview.pairs.len(), 3);
        assert_eq!(overview.pairs[0].liquidity_usd(), 900.0);
        assert_eq!(
            overview.best.unwrap().ranked.snapshot.quote_symbol_upper(),
            "USDC"
        );
    }

    #[tokio::test]
    async fn test_best_pairs_skips_empty_and_sorts() {
        let market = MockMarketData::new()
            .with_token_pairs("a", vec![snapshot("a", "USDC", 50.0)])
            .with_token_pairs("b", vec![snapshot("b", "USDC", 500.0)]);
        let (service, _, _) = service_with(market, MockTokenSecurity::new());

        let best = service
            .best_pairs(&["a".to_string(), "missing".to_string(), "b".to_string()])
            .await;

        assert_eq!(best.len(), 2);
        assert_eq!(best[0].base_address(), "b");
        assert_eq!(best[1].base_address(), "a");
    }

    #[tokio::test]
    async fn test_verified_board_queries_registry_mints() {
        let market = MockMarketData::new().with_batch(vec![snapshot("good-mint", "USDC", 10.0)]);
        let (service, market, _) = service_with(market, MockTokenSecurity::new());

        let board = service.verified_board(&ListQuery::default()).await;

        assert_eq!(board.len(), 1);
        assert!(board[0].ranked.verified);
        assert_eq!(market.get_calls(), vec!["batch:good-mint"]);
    }
}
