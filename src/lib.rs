//! Token Universe - Solana token dashboard aggregator library
//!
//! Screens DexScreener pair listings into bounded, deduplicated, risk
//! annotated boards backed by on-chain mint security checks.
//!
//! # Modules
//!
//! - `domain`: Core screening logic (pair model, ranking, risk, registry)
//! - `ports`: Trait abstractions (MarketDataPort, TokenSecurityPort)
//! - `adapters`: External implementations (DexScreener, Solana RPC, CLI)
//! - `application`: Annotation pipeline and the TokenBoardService facade
//! - `cache`: Generic TTL cache
//! - `config`: Configuration loading and validation

pub mod adapters;
pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod ports;
