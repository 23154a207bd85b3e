//! CLI Command Definitions
//!
//! The dashboard's consumer surface: every board the pipeline can shape is
//! reachable as a subcommand, sharing the same filter and sort flags.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Token Universe - Solana token dashboard aggregator
#[derive(Parser, Debug)]
#[command(
    name = "token-universe",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Solana token dashboard aggregator",
    long_about = "Token Universe screens DexScreener pair listings: best venue per \
                  token, liquidity/volume/age filters, on-chain mint security checks, \
                  and a heuristic risk score per pair."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search pairs by symbol, name, or address
    Search(SearchCmd),

    /// Show the trending board (top boosted tokens)
    Trending(BoardCmd),

    /// Show newly listed tokens (latest profiles)
    Latest(BoardCmd),

    /// Show the verified allow-list board
    Verified(BoardCmd),

    /// Show every venue for one token
    Token(TokenCmd),

    /// Show the best venue for each given token
    Best(BestCmd),
}

/// Shared screening flags
#[derive(Parser, Debug)]
pub struct ScreenArgs {
    /// Sort key: liq, mcap, vol, age, h24, txns
    #[arg(long, value_name = "KEY", default_value = "liq")]
    pub sort: String,

    /// Minimum pooled liquidity in USD
    #[arg(long, value_name = "USD")]
    pub min_liq: Option<f64>,

    /// Minimum 24h volume in USD
    #[arg(long, value_name = "USD")]
    pub min_vol: Option<f64>,

    /// Maximum pair age in hours
    #[arg(long, value_name = "HOURS")]
    pub max_age_h: Option<f64>,

    /// Preferred quote symbol, ranked ahead of USDT and SOL
    #[arg(long, value_name = "SYMBOL")]
    pub quote: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

/// Search pairs
#[derive(Parser, Debug)]
pub struct SearchCmd {
    /// Search query (symbol, name, or address)
    #[arg(value_name = "QUERY")]
    pub query: String,

    #[command(flatten)]
    pub screen: ScreenArgs,
}

/// Discovery board
#[derive(Parser, Debug)]
pub struct BoardCmd {
    #[command(flatten)]
    pub screen: ScreenArgs,
}

/// Per-token overview
#[derive(Parser, Debug)]
pub struct TokenCmd {
    /// Token mint address
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Output format (text, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

/// Best venue per token
#[derive(Parser, Debug)]
pub struct BestCmd {
    /// Token mint addresses
    #[arg(value_name = "ADDRESS", required = true)]
    pub addresses: Vec<String>,

    /// Output format (text, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command_parses() {
        let app = CliApp::parse_from([
            "token-universe",
            "search",
            "bonk",
            "--sort",
            "vol",
            "--min-liq",
            "1000",
            "--quote",
            "USDC",
        ]);
        match app.command {
            Command::Search(cmd) => {
                assert_eq!(cmd.query, "bonk");
                assert_eq!(cmd.screen.sort, "vol");
                assert_eq!(cmd.screen.min_liq, Some(1000.0));
                assert_eq!(cmd.screen.quote.as_deref(), Some("USDC"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_board_defaults() {
        let app = CliApp::parse_from(["token-universe", "trending"]);
        match app.command {
            Command::Trending(cmd) => {
                assert_eq!(cmd.screen.sort, "liq");
                assert_eq!(cmd.screen.format, "text");
                assert_eq!(cmd.screen.min_liq, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_best_requires_addresses() {
        assert!(CliApp::try_parse_from(["token-universe", "best"]).is_err());
        let app = CliApp::parse_from(["token-universe", "best", "mint1", "mint2"]);
        match app.command {
            Command::Best(cmd) => assert_eq!(cmd.addresses.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
