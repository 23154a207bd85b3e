//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching the
//! config/default.toml structure. Every section has defaults, so a missing
//! file falls back to a fully working configuration; a present but
//! malformed file is a hard error (a half-read config is worse than none).

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Main configuration structure matching config/default.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen: ScreenSection,
    pub dexscreener: DexScreenerSection,
    pub solana: SolanaSection,
    pub cache: CacheSection,
    pub verified: VerifiedSection,
    pub logging: LoggingSection,
}

/// Screening defaults applied when the CLI does not override them
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScreenSection {
    /// Chain identifier pairs must match exactly
    pub chain_id: String,
    /// Preferred quote symbols, best first (stablecoins before SOL)
    pub quote_preference: Vec<String>,
    /// Default minimum pooled liquidity in USD
    pub min_liquidity_usd: f64,
    /// Default minimum 24h volume in USD
    pub min_volume_usd: f64,
    /// Default maximum pair age in hours (unset = no age filter)
    pub max_age_hours: Option<f64>,
}

impl Default for ScreenSection {
    fn default() -> Self {
        Self {
            chain_id: "solana".to_string(),
            quote_preference: vec![
                "USDC".to_string(),
                "USDT".to_string(),
                "SOL".to_string(),
            ],
            min_liquidity_usd: 0.0,
            min_volume_usd: 0.0,
            max_age_hours: None,
        }
    }
}

/// DexScreener API configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DexScreenerSection {
    /// API base URL
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DexScreenerSection {
    fn default() -> Self {
        Self {
            api_url: "https://api.dexscreener.com".to_string(),
            timeout_secs: 12,
        }
    }
}

/// Solana RPC configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolanaSection {
    /// RPC endpoint (use a private RPC to avoid public rate limits)
    pub rpc_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SolanaSection {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            timeout_secs: 12,
        }
    }
}

impl SolanaSection {
    /// Get RPC URL with environment variable override.
    /// Checks SOLANA_RPC_URL env var first, falls back to config value.
    pub fn get_rpc_url(&self) -> String {
        std::env::var("SOLANA_RPC_URL").unwrap_or_else(|_| self.rpc_url.clone())
    }
}

/// Cache TTLs in seconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Shaped search responses
    pub search_ttl_secs: u64,
    /// Shaped discovery boards (trending / latest / verified)
    pub list_ttl_secs: u64,
    /// Per-token overviews and best-pair lookups
    pub token_ttl_secs: u64,
    /// Raw upstream pair payloads
    pub raw_pairs_ttl_secs: u64,
    /// Raw discovery feed payloads
    pub discovery_ttl_secs: u64,
    /// Successful mint security lookups
    pub security_ttl_secs: u64,
    /// Safe-default security entries written after a 429
    pub rate_limited_ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            search_ttl_secs: 15,
            list_ttl_secs: 20,
            token_ttl_secs: 20,
            raw_pairs_ttl_secs: 20,
            discovery_ttl_secs: 60,
            security_ttl_secs: 3600,
            rate_limited_ttl_secs: 300,
        }
    }
}

/// Verified registry configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerifiedSection {
    /// Path to the symbol -> mint JSON allow-list
    pub registry_path: String,
}

impl Default for VerifiedSection {
    fn default() -> Self {
        Self {
            registry_path: "data/verified_tokens.json".to_string(),
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Load from `path` when it exists; otherwise warn and use defaults.
    /// A present but unreadable/invalid file is still a hard error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            load_config(path)
        } else {
            warn!(path = %path.display(), "config file not found, using built-in defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.chain_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "chain_id cannot be empty".to_string(),
            ));
        }

        if self.screen.quote_preference.is_empty() {
            return Err(ConfigError::ValidationError(
                "quote_preference must list at least one symbol".to_string(),
            ));
        }

        if self.screen.min_liquidity_usd < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "min_liquidity_usd must be >= 0, got {}",
                self.screen.min_liquidity_usd
            )));
        }

        if self.screen.min_volume_usd < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "min_volume_usd must be >= 0, got {}",
                self.screen.min_volume_usd
            )));
        }

        if let Some(max_age) = self.screen.max_age_hours {
            if max_age <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "max_age_hours must be > 0 when set, got {max_age}"
                )));
            }
        }

        if self.dexscreener.api_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "api_url cannot be empty".to_string(),
            ));
        }

        if self.dexscreener.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "dexscreener timeout_secs must be > 0".to_string(),
            ));
        }

        if self.solana.rpc_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "rpc_url cannot be empty".to_string(),
            ));
        }

        if self.solana.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "solana timeout_secs must be > 0".to_string(),
            ));
        }

        if self.verified.registry_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "registry_path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
