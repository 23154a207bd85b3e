//! Token Security Adapter
//!
//! Implements `TokenSecurityPort` against a Solana JSON-RPC endpoint.

pub mod client;

pub use client::{RpcSecurityClient, RpcSecurityConfig, SecurityError};
