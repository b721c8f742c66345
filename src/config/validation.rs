//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, intervals > 0)
//! - Check endpoint URLs actually parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: EngineConfig → Result<(), Vec<ValidationError>>

use crate::config::schema::EngineConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidRpcUrl(String),
    ZeroChainId,
    ZeroTimeout,
    ZeroPollInterval,
    ZeroDeadline,
    NonPositiveGasMultiplier,
    ZeroMaxGasPrice,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidRpcUrl(url) => write!(f, "invalid RPC URL '{}'", url),
            ValidationError::ZeroChainId => write!(f, "chain_id must be non-zero"),
            ValidationError::ZeroTimeout => write!(f, "rpc_timeout_secs must be positive"),
            ValidationError::ZeroPollInterval => write!(f, "poll_interval_ms must be positive"),
            ValidationError::ZeroDeadline => write!(f, "deadline_secs must be positive"),
            ValidationError::NonPositiveGasMultiplier => {
                write!(f, "gas price_multiplier must be positive")
            }
            ValidationError::ZeroMaxGasPrice => write!(f, "max_price_gwei must be positive"),
        }
    }
}

/// Validate semantic constraints on a parsed configuration.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.node.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::InvalidRpcUrl(config.node.rpc_url.clone()));
    }
    for failover in &config.node.failover_urls {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::InvalidRpcUrl(failover.clone()));
        }
    }
    if config.node.chain_id == 0 {
        errors.push(ValidationError::ZeroChainId);
    }
    if config.node.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }
    if config.confirmation.deadline_secs == 0 {
        errors.push(ValidationError::ZeroDeadline);
    }
    if config.gas.price_multiplier <= 0.0 {
        errors.push(ValidationError::NonPositiveGasMultiplier);
    }
    if config.gas.max_price_gwei == 0 {
        errors.push(ValidationError::ZeroMaxGasPrice);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
