//! Error taxonomy for the submission engine.
//!
//! # Design Decisions
//! - One enum for the whole engine; callers match on variants to decide
//!   corrective action
//! - Submission rejections are reported distinctly (nonce conflict,
//!   insufficient funds, underpriced, malformed encoding) because each
//!   implies a different fix
//! - Only `Transport` is retryable; everything else needs changed inputs

use thiserror::Error;

/// Errors that can occur while building, signing, submitting, or tracking
/// a transaction.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Network or node unreachable, or the request timed out.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node returned a JSON-RPC error object for a well-formed request.
    #[error("node error (code {code}): {message}")]
    Node { code: i64, message: String },

    /// Caller supplied invalid transaction fields.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Malformed private key material.
    #[error("signing error: {0}")]
    Signing(String),

    /// The nonce was already consumed by another transaction.
    #[error("nonce conflict: {0}")]
    NonceConflict(String),

    /// Sender balance cannot cover value plus maximum gas cost.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Gas price below the network's current acceptance floor.
    #[error("transaction underpriced: {0}")]
    Underpriced(String),

    /// The payload is not a valid canonical transaction encoding.
    #[error("malformed transaction encoding: {0}")]
    Encoding(String),

    /// Signature or configuration bound to a different chain.
    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Suggested gas price above the configured ceiling.
    #[error("gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u128, max_gwei: u64 },
}

impl EngineError {
    /// Whether retrying the same operation unchanged can succeed.
    ///
    /// Only transport-layer failures qualify; every other variant needs
    /// corrected inputs first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Transport(_))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
