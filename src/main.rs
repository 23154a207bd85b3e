//! Token Universe - Solana token dashboard aggregator
//!
//! CLI entry point: loads configuration, wires the upstream clients into
//! the board service, and renders the requested board.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use token_universe::adapters::cli::render::{render_board_text, render_overview_text};
use token_universe::adapters::cli::{
    BestCmd, BoardCmd, CliApp, Command, ScreenArgs, SearchCmd, TokenCmd,
};
use token_universe::adapters::dexscreener::{DexScreenerClient, DexScreenerConfig};
use token_universe::adapters::token_security::{RpcSecurityClient, RpcSecurityConfig};
use token_universe::application::pipeline::AnnotatedPair;
use token_universe::application::service::{BoardConfig, ListQuery, TokenBoardService};
use token_universe::config::Config;
use token_universe::domain::ranking::SortKey;
use token_universe::domain::verified::VerifiedRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (private RPC URLs go here, not in config).
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Search(cmd) => search_command(cmd).await,
        Command::Trending(cmd) => board_command(cmd, Board::Trending).await,
        Command::Latest(cmd) => board_command(cmd, Board::Latest).await,
        Command::Verified(cmd) => board_command(cmd, Board::Verified).await,
        Command::Token(cmd) => token_command(cmd).await,
        Command::Best(cmd) => best_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).init();
}

/// Build the service stack from a config file path.
fn build_service(config_path: &Path) -> Result<TokenBoardService> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;

    let market = DexScreenerClient::new(DexScreenerConfig::from_config(&config))
        .context("Failed to create DexScreener client")?;
    let security = RpcSecurityClient::new(RpcSecurityConfig::from_config(&config))
        .context("Failed to create security client")?;

    let registry_path = shellexpand::tilde(&config.verified.registry_path).to_string();
    let registry = VerifiedRegistry::load(&registry_path);

    Ok(TokenBoardService::new(
        Arc::new(market),
        Arc::new(security),
        registry,
        BoardConfig::from_config(&config),
    ))
}

/// Translate the shared CLI flags into pipeline options.
fn list_query(screen: &ScreenArgs) -> ListQuery {
    let quote_preference = screen.quote.as_ref().map(|q| {
        vec![q.to_uppercase(), "USDT".to_string(), "SOL".to_string()]
    });
    ListQuery {
        sort: SortKey::parse(&screen.sort),
        min_liquidity_usd: screen.min_liq.unwrap_or(0.0),
        min_volume_usd: screen.min_vol.unwrap_or(0.0),
        max_age_hours: screen.max_age_h,
        quote_preference,
    }
}

fn print_board(pairs: &[AnnotatedPair], format: &str) -> Result<()> {
    if format.eq_ignore_ascii_case("json") {
        println!("{}", serde_json::to_string_pretty(pairs)?);
    } else {
        println!("{}", render_board_text(pairs, Utc::now().timestamp_millis()));
    }
    Ok(())
}

async fn search_command(cmd: SearchCmd) -> Result<()> {
    let service = build_service(&cmd.screen.config)?;
    let board = service.search(&cmd.query, &list_query(&cmd.screen)).await;
    print_board(&board, &cmd.screen.format)
}

enum Board {
    Trending,
    Latest,
    Verified,
}

async fn board_command(cmd: BoardCmd, board: Board) -> Result<()> {
    let service = build_service(&cmd.screen.config)?;
    let query = list_query(&cmd.screen);
    let pairs = match board {
        Board::Trending => service.trending(&query).await,
        Board::Latest => service.newly_listed(&query).await,
        Board::Verified => service.verified_board(&query).await,
    };
    print_board(&pairs, &cmd.screen.format)
}

async fn token_command(cmd: TokenCmd) -> Result<()> {
    let service = build_service(&cmd.config)?;
    let overview = service.token_overview(&cmd.address).await;
    if cmd.format.eq_ignore_ascii_case("json") {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        println!(
            "{}",
            render_overview_text(&overview, Utc::now().timestamp_millis())
        );
    }
    Ok(())
}

async fn best_command(cmd: BestCmd) -> Result<()> {
    let service = build_service(&cmd.config)?;
    let board = service.best_pairs(&cmd.addresses).await;
    print_board(&board, &cmd.format)
}
