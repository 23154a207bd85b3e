//! Mint Security Client
//!
//! Looks up mint and freeze authorities for a token mint via the Solana
//! JSON-RPC `getAccountInfo` call with parsed encoding. Results are cached
//! per mint for an hour; a rate-limited response caches the safe default
//! for five minutes so a throttling RPC is not hammered; any other failure
//! returns the safe default uncached. No retries.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::ports::market_data::Sourced;
use crate::ports::security::{MintSecurity, TokenSecurityPort};

/// Client errors (internal; the port surface absorbs them)
#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("RPC returned status: {0}")]
    Status(StatusCode),
    #[error("RPC error: {0}")]
    Rpc(String),
}

/// Security client configuration
#[derive(Debug, Clone)]
pub struct RpcSecurityConfig {
    /// Solana JSON-RPC endpoint
    pub rpc_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// TTL for successful lookups
    pub security_ttl: Duration,
    /// TTL for the safe default written after a 429
    pub rate_limited_ttl: Duration,
}

impl Default for RpcSecurityConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            timeout: Duration::from_secs(12),
            security_ttl: Duration::from_secs(3600),
            rate_limited_ttl: Duration::from_secs(300),
        }
    }
}

impl RpcSecurityConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            // get_rpc_url honors the SOLANA_RPC_URL env override.
            rpc_url: config.solana.get_rpc_url(),
            timeout: Duration::from_secs(config.solana.timeout_secs),
            security_ttl: Duration::from_secs(config.cache.security_ttl_secs),
            rate_limited_ttl: Duration::from_secs(config.cache.rate_limited_ttl_secs),
        }
    }
}

/// Mint authority lookup over Solana JSON-RPC
#[derive(Debug, Clone)]
pub struct RpcSecurityClient {
    config: RpcSecurityConfig,
    http: Client,
    cache: Arc<Mutex<TtlCache<MintSecurity>>>,
}

impl RpcSecurityClient {
    pub fn new(config: RpcSecurityConfig) -> Result<Self, SecurityError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http,
            cache: Arc::new(Mutex::new(TtlCache::new())),
        })
    }

    async fn fetch(&self, mint: &str) -> Result<MintSecurity, SecurityError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": mint,
            "method": "getAccountInfo",
            "params": [mint, {"encoding": "jsonParsed"}],
        });

        let response = self
            .http
            .post(&self.config.rpc_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SecurityError::Status(status));
        }

        let body: Value = response.json().await?;
        if let Some(err) = body.get("error") {
            return Err(SecurityError::Rpc(err.to_string()));
        }

        Ok(extract_authorities(&body))
    }
}

/// Pull the authority fields out of a parsed `getAccountInfo` response.
/// Anything missing along the path (unknown account, non-mint account,
/// unparsed data) collapses to the safe default.
fn extract_authorities(body: &Value) -> MintSecurity {
    let info = body
        .pointer("/result/value/data/parsed/info")
        .and_then(Value::as_object);

    let authority = |key: &str| -> Option<String> {
        info.and_then(|i| i.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    MintSecurity {
        mint_authority: authority("mintAuthority"),
        freeze_authority: authority("freezeAuthority"),
    }
}

#[async_trait]
impl TokenSecurityPort for RpcSecurityClient {
    async fn mint_security(&self, mint: &str) -> Sourced<MintSecurity> {
        let mint = mint.trim();
        if mint.is_empty() {
            return Sourced::fallback(MintSecurity::safe_default());
        }
        if Pubkey::from_str(mint).is_err() {
            warn!(mint, "not a valid mint address, skipping security lookup");
            return Sourced::fallback(MintSecurity::safe_default());
        }

        let cache_key = format!("mintsec:{mint}");
        {
            let mut cache = self.cache.lock().await;
            if let Some(security) = cache.get(&cache_key) {
                debug!(mint, "security cache hit");
                return Sourced::cached(security);
            }
        }

        match self.fetch(mint).await {
            Ok(security) => {
                self.cache.lock().await.set(
                    cache_key,
                    security.clone(),
                    self.config.security_ttl,
                );
                Sourced::upstream(security)
            }
            Err(SecurityError::Status(StatusCode::TOO_MANY_REQUESTS)) => {
                warn!(mint, "security lookup rate limited, caching safe default");
                let security = MintSecurity::safe_default();
                self.cache.lock().await.set(
                    cache_key,
                    security.clone(),
                    self.config.rate_limited_ttl,
                );
                Sourced::fallback(security)
            }
            Err(e) => {
                // Returned uncached so the next request gets a fresh try.
                warn!(mint, error = %e, "security lookup failed, substituting safe default");
                Sourced::fallback(MintSecurity::safe_default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_authorities_from_parsed_mint() {
        let body = json!({
            "jsonrpc": "2.0",
            "result": {
                "context": {"slot": 1},
                "value": {
                    "data": {
                        "parsed": {
                            "info": {
                                "decimals": 9,
                                "mintAuthority": "Auth1111111111111111111111111111",
                                "freezeAuthority": null,
                                "supply": "1000"
                            },
                            "type": "mint"
                        },
                        "program": "spl-token"
                    },
                    "owner": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
                }
            }
        });

        let security = extract_authorities(&body);
        assert_eq!(
            security.mint_authority.as_deref(),
            Some("Auth1111111111111111111111111111")
        );
        assert!(security.is_mintable());
        assert!(!security.is_freezable());
    }

    #[test]
    fn test_extract_authorities_handles_missing_account() {
        // Unknown accounts come back with a null value.
        let body = json!({"jsonrpc": "2.0", "result": {"value": null}});
        let security = extract_authorities(&body);
        assert_eq!(security, MintSecurity::safe_default());

        // Non-parsed data arrives as a [base64, encoding] tuple.
        let body = json!({"result": {"value": {"data": ["AAAA", "base64"]}}});
        assert_eq!(extract_authorities(&body), MintSecurity::safe_default());
    }

    #[test]
    fn test_config_defaults() {
        let config = RpcSecurityConfig::default();
        assert_eq!(config.security_ttl, Duration::from_secs(3600));
        assert_eq!(config.rate_limited_ttl, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_invalid_mint_short_circuits_to_safe_default() {
        let client = RpcSecurityClient::new(RpcSecurityConfig::default()).unwrap();

        let result = client.mint_security("").await;
        assert!(result.is_fallback());
        assert_eq!(result.value, MintSecurity::safe_default());

        let result = client.mint_security("definitely-not-base58!").await;
        assert!(result.is_fallback());
        assert_eq!(result.value, MintSecurity::safe_default());
    }
}
