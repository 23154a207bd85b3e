//! Application Layer - Request pipelines
//!
//! - `pipeline`: security/risk annotation fan-out over ranked pairs
//! - `service`: the `TokenBoardService` facade the presentation layer calls

pub mod pipeline;
pub mod service;

pub use pipeline::{annotate_pairs, pick_best_by_liquidity, AnnotatedPair};
pub use service::{BoardConfig, ListQuery, TokenBoardService, TokenOverview};
