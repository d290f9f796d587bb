//! The language-model oracle interface.
//!
//! The oracle is an opaque text-completion dependency: one system
//! instruction, one user message, bounded output, deterministic-ish at
//! temperature 0. Every call is attempted exactly once; retry policy is
//! the application layer's decision.

pub mod anthropic;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use thiserror::Error;

// Re-export the concrete client
pub use anthropic::AnthropicOracle;

/// A single completion request
#[derive(Debug, Clone)]
pub struct OracleRequest {
    /// System instructions
    pub system: String,

    /// The user message
    pub user: String,

    /// Sampling temperature (extraction and analysis run at 0.0,
    /// revision chat at 0.1)
    pub temperature: f32,

    /// Output token budget
    pub max_tokens: u32,
}

/// Failures of an oracle invocation.
///
/// These are expected failures, recovered at the call site: extraction
/// degrades to an empty chunk result, analysis and chat surface the
/// error as a value.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request timed out")]
    Timeout,

    #[error("oracle rejected the credentials")]
    Auth,

    #[error("oracle rate limit reached")]
    RateLimit,

    #[error("oracle api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error reaching oracle: {0}")]
    Network(String),

    #[error("oracle returned an empty reply")]
    EmptyReply,
}

/// Text-completion interface consumed by the extractor, the analysis
/// engine, and the revision session.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Perform one completion round-trip
    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError>;
}
