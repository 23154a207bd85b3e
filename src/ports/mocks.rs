//! Hand-rolled port mocks for pipeline tests
//!
//! Each mock records the calls it receives and replays configured
//! responses. A mock can also be flipped into failure mode, where every
//! method returns the absorbed-failure default, to exercise the
//! error-absorption contract end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::pair::PairSnapshot;
use crate::ports::market_data::{MarketDataPort, Sourced, TokenHighlight};
use crate::ports::security::{MintSecurity, TokenSecurityPort};

/// Mock market data port with canned responses per query/address.
#[derive(Debug, Default)]
pub struct MockMarketData {
    calls: Arc<Mutex<Vec<String>>>,
    search_responses: Mutex<HashMap<String, Vec<PairSnapshot>>>,
    token_responses: Mutex<HashMap<String, Vec<PairSnapshot>>>,
    batch_response: Mutex<Vec<PairSnapshot>>,
    profiles: Mutex<Vec<TokenHighlight>>,
    boosted: Mutex<Vec<TokenHighlight>>,
    failing: bool,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every method answers with the absorbed-failure default.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_search(self, query: &str, pairs: Vec<PairSnapshot>) -> Self {
        self.search_responses
            .lock()
            .unwrap()
            .insert(query.to_string(), pairs);
        self
    }

    pub fn with_token_pairs(self, address: &str, pairs: Vec<PairSnapshot>) -> Self {
        self.token_responses
            .lock()
            .unwrap()
            .insert(address.to_string(), pairs);
        self
    }

    pub fn with_batch(self, pairs: Vec<PairSnapshot>) -> Self {
        *self.batch_response.lock().unwrap() = pairs;
        self
    }

    pub fn with_profiles(self, rows: Vec<TokenHighlight>) -> Self {
        *self.profiles.lock().unwrap() = rows;
        self
    }

    pub fn with_boosted(self, rows: Vec<TokenHighlight>) -> Self {
        *self.boosted.lock().unwrap() = rows;
        self
    }

    /// All recorded calls, in order.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MarketDataPort for MockMarketData {
    async fn search(&self, query: &str) -> Sourced<Vec<PairSnapshot>> {
        self.record(format!("search:{query}"));
        if self.failing {
            return Sourced::fallback(Vec::new());
        }
        let pairs = self
            .search_responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();
        Sourced::upstream(pairs)
    }

    async fn pairs_for_token(&self, token_address: &str) -> Sourced<Vec<PairSnapshot>> {
        self.record(format!("token:{token_address}"));
        if self.failing {
            return Sourced::fallback(Vec::new());
        }
        let pairs = self
            .token_responses
            .lock()
            .unwrap()
            .get(token_address)
            .cloned()
            .unwrap_or_default();
        Sourced::upstream(pairs)
    }

    async fn pairs_for_tokens(&self, token_addresses: &[String]) -> Sourced<Vec<PairSnapshot>> {
        self.record(format!("batch:{}", token_addresses.join(",")));
        if self.failing {
            return Sourced::fallback(Vec::new());
        }
        Sourced::upstream(self.batch_response.lock().unwrap().clone())
    }

    async fn latest_profiles(&self) -> Sourced<Vec<TokenHighlight>> {
        self.record("profiles".to_string());
        if self.failing {
            return Sourced::fallback(Vec::new());
        }
        Sourced::upstream(self.profiles.lock().unwrap().clone())
    }

    async fn top_boosted(&self) -> Sourced<Vec<TokenHighlight>> {
        self.record("boosted".to_string());
        if self.failing {
            return Sourced::fallback(Vec::new());
        }
        Sourced::upstream(self.boosted.lock().unwrap().clone())
    }
}

/// Mock security port; unconfigured mints come back safe.
#[derive(Debug, Default)]
pub struct MockTokenSecurity {
    calls: Arc<Mutex<Vec<String>>>,
    responses: Mutex<HashMap<String, MintSecurity>>,
    failing: bool,
}

impl MockTokenSecurity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_security(self, mint: &str, security: MintSecurity) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(mint.to_string(), security);
        self
    }

    /// Shorthand for a mint with a live mint authority.
    pub fn with_mintable(self, mint: &str) -> Self {
        self.with_security(
            mint,
            MintSecurity {
                mint_authority: Some("MintAuth111".to_string()),
                freeze_authority: None,
            },
        )
    }

    /// Shorthand for a mint with a live freeze authority.
    pub fn with_freezable(self, mint: &str) -> Self {
        self.with_security(
            mint,
            MintSecurity {
                mint_authority: None,
                freeze_authority: Some("FreezeAuth111".to_string()),
            },
        )
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenSecurityPort for MockTokenSecurity {
    async fn mint_security(&self, mint: &str) -> Sourced<MintSecurity> {
        self.calls.lock().unwrap().push(mint.to_string());
        if self.failing {
            return Sourced::fallback(MintSecurity::safe_default());
        }
        match self.responses.lock().unwrap().get(mint) {
            Some(security) => Sourced::upstream(security.clone()),
            None => Sourced::upstream(MintSecurity::safe_default()),
        }
    }
}
