//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the submission engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Node endpoint settings.
    pub node: NodeConfig,

    /// Gas pricing policy.
    pub gas: GasConfig,

    /// Confirmation tracking settings.
    pub confirmation: ConfirmationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Node endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order on transport failure.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 11155111 for Sepolia,
    /// 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
        }
    }
}

/// Gas pricing policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Multiplier applied to the node's suggested price
    /// (1.0 = suggested, 1.2 = 20% buffer).
    pub price_multiplier: f64,

    /// Maximum accepted gas price in gwei (protection against spikes).
    pub max_price_gwei: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            price_multiplier: 1.0,
            max_price_gwei: 500,
        }
    }
}

/// Confirmation tracking configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Blocks that must be mined on top of the including block before a
    /// transaction counts as confirmed.
    pub depth: u32,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Deadline for the whole confirmation wait, in seconds. A transaction
    /// with no receipt by the deadline is reported as dropped.
    pub deadline_secs: u64,

    /// Base delay for transport-error backoff, in milliseconds.
    pub backoff_base_ms: u64,

    /// Cap for transport-error backoff, in milliseconds.
    pub backoff_max_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            poll_interval_ms: 2_000,
            deadline_secs: 180,
            backoff_base_ms: 500,
            backoff_max_ms: 8_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.node.rpc_timeout_secs, 10);
        assert_eq!(config.confirmation.depth, 3);
        assert_eq!(config.gas.max_price_gwei, 500);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_minimal_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            [node]
            rpc_url = "https://sepolia.example.org"
            chain_id = 11155111
            "#,
        )
        .unwrap();
        assert_eq!(config.node.chain_id, 11155111);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.confirmation.poll_interval_ms, 2_000);
    }
}
