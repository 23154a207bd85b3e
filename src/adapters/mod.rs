//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - DexScreener: pair search, batch lookups, and discovery feeds
//! - Token Security: Solana JSON-RPC mint authority lookups
//! - CLI: command-line consumer of the shaped boards

pub mod cli;
pub mod dexscreener;
pub mod token_security;

pub use cli::CliApp;
pub use dexscreener::{DexScreenerClient, DexScreenerConfig};
pub use token_security::{RpcSecurityClient, RpcSecurityConfig};
