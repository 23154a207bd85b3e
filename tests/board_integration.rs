//! Board Pipeline Integration Tests
//!
//! Exercises the full request pipeline - fetch, chain filter, dedupe,
//! display filters, sort, security annotation, risk scoring, caching -
//! through the TokenBoardService with mock ports. All tests are
//! deterministic; no network calls.

use std::sync::Arc;

use token_universe::application::service::{BoardConfig, ListQuery, TokenBoardService};
use token_universe::domain::pair::{LiquidityInfo, PairSnapshot, TokenInfo, TxnCounts, TxnWindows, WindowedStat};
use token_universe::domain::ranking::{Rarity, SortKey};
use token_universe::domain::risk::RiskLabel;
use token_universe::domain::verified::VerifiedRegistry;
use token_universe::ports::market_data::TokenHighlight;
use token_universe::ports::mocks::{MockMarketData, MockTokenSecurity};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Build a pair snapshot with the metrics the pipeline cares about.
fn make_pair(base: &str, quote: &str, liquidity: f64) -> PairSnapshot {
    PairSnapshot {
        chain_id: "solana".to_string(),
        dex_id: Some("raydium".to_string()),
        base_token: TokenInfo {
            address: base.to_string(),
            name: Some(format!("{base} Token")),
            symbol: Some(base.to_uppercase()),
        },
        quote_token: TokenInfo {
            address: format!("{quote}-mint"),
            name: None,
            symbol: Some(quote.to_string()),
        },
        liquidity: Some(LiquidityInfo {
            usd: Some(liquidity),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn with_volume(mut pair: PairSnapshot, volume_h24: f64) -> PairSnapshot {
    pair.volume = Some(WindowedStat {
        h24: Some(volume_h24),
        ..Default::default()
    });
    pair
}

fn with_txns(mut pair: PairSnapshot, buys: u64, sells: u64) -> PairSnapshot {
    pair.txns = Some(TxnWindows {
        h24: Some(TxnCounts {
            buys: Some(buys),
            sells: Some(sells),
        }),
        ..Default::default()
    });
    pair
}

fn service(market: MockMarketData, security: MockTokenSecurity) -> TokenBoardService {
    TokenBoardService::new(
        Arc::new(market),
        Arc::new(security),
        VerifiedRegistry::from_entries([(
            "SOL",
            "So11111111111111111111111111111111111111112",
        )]),
        BoardConfig::default(),
    )
}

// ============================================================================
// Search pipeline
// ============================================================================

#[tokio::test]
async fn search_dedupes_ties_by_quote_preference() {
    // Three venues for one token with liquidities [500, 1500, 1500] and
    // quotes [USDT, USDC, SOL]: the USDC venue must win the tie.
    let market = MockMarketData::new().with_search(
        "tok",
        vec![
            make_pair("tok", "USDT", 500.0),
            make_pair("tok", "USDC", 1_500.0),
            make_pair("tok", "SOL", 1_500.0),
        ],
    );
    let board = service(market, MockTokenSecurity::new())
        .search("tok", &ListQuery::default())
        .await;

    assert_eq!(board.len(), 1);
    assert_eq!(board[0].ranked.snapshot.quote_symbol_upper(), "USDC");
    assert_eq!(board[0].liquidity_usd(), 1_500.0);
}

#[tokio::test]
async fn search_drops_other_chains_and_ranks_by_liquidity() {
    let mut eth_pair = make_pair("eth-token", "USDC", 9_999_999.0);
    eth_pair.chain_id = "ethereum".to_string();

    let market = MockMarketData::new().with_search(
        "cat",
        vec![
            make_pair("cat-a", "USDC", 100.0),
            eth_pair,
            make_pair("cat-b", "USDC", 300.0),
            make_pair("cat-c", "USDC", 200.0),
        ],
    );
    let board = service(market, MockTokenSecurity::new())
        .search("cat", &ListQuery::default())
        .await;

    let bases: Vec<&str> = board.iter().map(|p| p.base_address()).collect();
    assert_eq!(bases, vec!["cat-b", "cat-c", "cat-a"]);
}

#[tokio::test]
async fn search_applies_min_liquidity_filter() {
    let market = MockMarketData::new().with_search(
        "tok",
        vec![
            make_pair("rich", "USDC", 5_000.0),
            make_pair("poor", "USDC", 999.0),
        ],
    );
    let query = ListQuery {
        min_liquidity_usd: 1_000.0,
        ..Default::default()
    };
    let board = service(market, MockTokenSecurity::new())
        .search("tok", &query)
        .await;

    assert_eq!(board.len(), 1);
    assert!(board.iter().all(|p| p.liquidity_usd() >= 1_000.0));
}

#[tokio::test]
async fn mintable_token_never_reaches_the_board() {
    // Highest liquidity in the result set, but its mint authority is live.
    let market = MockMarketData::new().with_search(
        "tok",
        vec![
            make_pair("inflatable", "USDC", 1_000_000.0),
            make_pair("honest", "USDC", 1_000.0),
        ],
    );
    let security = MockTokenSecurity::new().with_mintable("inflatable");
    let board = service(market, security)
        .search("tok", &ListQuery::default())
        .await;

    assert_eq!(board.len(), 1);
    assert_eq!(board[0].base_address(), "honest");
}

#[tokio::test]
async fn freezable_token_never_reaches_the_board() {
    let market = MockMarketData::new()
        .with_search("tok", vec![make_pair("freezer", "USDC", 50_000.0)]);
    let security = MockTokenSecurity::new().with_freezable("freezer");
    let board = service(market, security)
        .search("tok", &ListQuery::default())
        .await;

    assert!(board.is_empty());
}

// ============================================================================
// Discovery boards
// ============================================================================

#[tokio::test]
async fn trending_board_flows_from_boosted_feed() {
    let market = MockMarketData::new()
        .with_boosted(vec![
            TokenHighlight {
                token_address: "hot1".to_string(),
                chain_id: "solana".to_string(),
                ..Default::default()
            },
            TokenHighlight {
                token_address: "hot2".to_string(),
                chain_id: "solana".to_string(),
                ..Default::default()
            },
        ])
        .with_batch(vec![
            with_volume(make_pair("hot1", "USDC", 50_000.0), 2_000_000.0),
            with_volume(make_pair("hot2", "USDC", 150_000.0), 500.0),
        ]);

    let query = ListQuery {
        sort: SortKey::Volume,
        ..Default::default()
    };
    let board = service(market, MockTokenSecurity::new()).trending(&query).await;

    assert_eq!(board.len(), 2);
    // Volume sort puts the high-volume pair first despite lower liquidity.
    assert_eq!(board[0].base_address(), "hot1");
}

#[tokio::test]
async fn dead_upstream_renders_an_empty_board_not_an_error() {
    let board = service(MockMarketData::failing(), MockTokenSecurity::new())
        .newly_listed(&ListQuery::default())
        .await;
    assert!(board.is_empty());
}

#[tokio::test]
async fn verified_board_tags_registry_members() {
    let market = MockMarketData::new().with_batch(vec![make_pair(
        "So11111111111111111111111111111111111111112",
        "USDC",
        25_000_000.0,
    )]);
    let board = service(market, MockTokenSecurity::new())
        .verified_board(&ListQuery::default())
        .await;

    assert_eq!(board.len(), 1);
    assert!(board[0].ranked.verified);
    assert_eq!(board[0].ranked.rarity, Rarity::Legendary);
}

// ============================================================================
// Annotation output
// ============================================================================

#[tokio::test]
async fn risk_annotation_reflects_market_quality() {
    // Deep, active, verified pair vs a shallow ghost-town pair.
    let blue_chip = with_txns(
        with_volume(
            make_pair("So11111111111111111111111111111111111111112", "USDC", 20_000_000.0),
            50_000_000.0,
        ),
        30_000,
        25_000,
    );
    let shallow = with_txns(
        with_volume(make_pair("dust", "USDC", 8_000.0), 1_000.0),
        30,
        10,
    );

    let market = MockMarketData::new().with_search("x", vec![blue_chip, shallow]);
    let board = service(market, MockTokenSecurity::new())
        .search("x", &ListQuery::default())
        .await;

    assert_eq!(board.len(), 2);
    let deep = &board[0];
    let thin = &board[1];

    assert_eq!(deep.risk.label, RiskLabel::Low);
    assert_eq!(thin.risk.label, RiskLabel::Extreme);
    assert!(deep.risk.score < thin.risk.score);
}

#[tokio::test]
async fn overview_surfaces_best_venue_and_keeps_all() {
    let market = MockMarketData::new().with_token_pairs(
        "tok",
        vec![
            make_pair("tok", "USDT", 100.0),
            make_pair("tok", "USDC", 900.0),
            make_pair("tok", "SOL", 400.0),
        ],
    );
    let overview = service(market, MockTokenSecurity::new())
        .token_overview("tok")
        .await;

    assert_eq!(overview.pairs.len(), 3);
    let liqs: Vec<f64> = overview.pairs.iter().map(|p| p.liquidity_usd()).collect();
    assert_eq!(liqs, vec![900.0, 400.0, 100.0]);
    assert_eq!(overview.best.unwrap().liquidity_usd(), 900.0);
}

#[tokio::test]
async fn board_payload_serializes_flat() {
    let market = MockMarketData::new().with_search("tok", vec![make_pair("tok", "USDC", 500.0)]);
    let board = service(market, MockTokenSecurity::new())
        .search("tok", &ListQuery::default())
        .await;

    let json = serde_json::to_value(&board).unwrap();
    let row = &json[0];
    // Wire fields, decoration, and annotation all land on one object.
    assert_eq!(row["chainId"], "solana");
    assert_eq!(row["liquidityUsd"], 500.0);
    assert_eq!(row["rarity"], "common");
    assert_eq!(row["mintable"], false);
    assert_eq!(row["liquidityLocked"], "unknown");
    assert!(row["risk"]["score"].is_number());
}
