//! JSON-RPC client with timeout, failover, and error classification.
//!
//! # Responsibilities
//! - Connect to one or more JSON-RPC endpoints
//! - Query chain state (pending nonce, gas price, chain id, head block)
//! - Submit raw transactions and look up receipts
//! - Classify failures: transport problems rotate providers, node-level
//!   rejections surface immediately with a distinct variant

use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{keccak256, Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::config::schema::NodeConfig;
use crate::error::{EngineError, EngineResult};
use crate::observability::metrics;
use crate::rpc::inspect::BlockSummary;
use crate::rpc::node::{NodeClient, Receipt};

/// Concrete node client backed by alloy HTTP providers.
#[derive(Clone)]
pub struct RpcClient {
    /// Providers in failover order (primary first).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Chain id this client is configured to talk to.
    expected_chain_id: u64,
    /// Per-request timeout.
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a client from node configuration.
    ///
    /// The primary URL must parse; invalid failover URLs are skipped with
    /// a warning. No connection is attempted here.
    pub fn new(config: &NodeConfig) -> EngineResult<Self> {
        let primary: url::Url = config.rpc_url.parse().map_err(|e| {
            EngineError::InvalidParameter(format!("invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let mut providers: Vec<Arc<dyn Provider + Send + Sync>> = Vec::new();
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary)));

        for url_str in &config.failover_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => providers.push(Arc::new(ProviderBuilder::new().connect_http(url))),
                Err(_) => tracing::warn!(url = %url_str, "ignoring invalid failover RPC URL"),
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            failovers = config.failover_urls.len(),
            chain_id = config.chain_id,
            "rpc client initialized"
        );

        Ok(Self {
            providers,
            expected_chain_id: config.chain_id,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    /// Verify the connected chain id matches configuration.
    ///
    /// Run before submitting anything: a signature bound to one chain is
    /// rejected by a node serving another.
    pub async fn verify_chain_id(&self) -> EngineResult<()> {
        let actual = self.chain_id().await?;
        if actual != self.expected_chain_id {
            return Err(EngineError::ChainMismatch {
                expected: self.expected_chain_id,
                actual,
            });
        }
        Ok(())
    }

    /// Read-only contract call (`eth_call`) with opaque call data.
    pub async fn call(&self, to: Address, data: Bytes) -> EngineResult<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(data);
        let mut last_transport = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.call(request.clone());
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(output)) => return Ok(output),
                Ok(Err(e)) => {
                    if let Some(err) = node_error(&e) {
                        return Err(err);
                    }
                    tracing::warn!(provider_idx = i, error = %e, "transport error, trying next provider");
                    last_transport = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "rpc timeout, trying next provider");
                    last_transport = Some("request timed out".to_string());
                }
            }
        }
        metrics::record_rpc_failure("eth_call");
        Err(all_providers_failed(last_transport))
    }

    /// Summarize a block's metadata. `None` selects the latest block;
    /// `Ok(None)` means the requested block is unknown to the node.
    pub async fn block_summary(&self, number: Option<u64>) -> EngineResult<Option<BlockSummary>> {
        let tag = match number {
            Some(n) => alloy::eips::BlockNumberOrTag::Number(n),
            None => alloy::eips::BlockNumberOrTag::Latest,
        };
        let mut last_transport = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_by_number(tag);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(block)) => return Ok(block.as_ref().map(BlockSummary::from_block)),
                Ok(Err(e)) => {
                    if let Some(err) = node_error(&e) {
                        return Err(err);
                    }
                    tracing::warn!(provider_idx = i, error = %e, "transport error, trying next provider");
                    last_transport = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "rpc timeout, trying next provider");
                    last_transport = Some("request timed out".to_string());
                }
            }
        }
        metrics::record_rpc_failure("eth_getBlockByNumber");
        Err(all_providers_failed(last_transport))
    }
}

#[async_trait]
impl NodeClient for RpcClient {
    async fn pending_nonce(&self, address: Address) -> EngineResult<u64> {
        let mut last_transport = None;
        for (i, provider) in self.providers.iter().enumerate() {
            // Pending view, so transactions queued from the same sender
            // are counted and consecutive builds do not collide.
            let fut = provider.get_transaction_count(address).pending();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(nonce)) => return Ok(nonce),
                Ok(Err(e)) => {
                    if let Some(err) = node_error(&e) {
                        return Err(err);
                    }
                    tracing::warn!(provider_idx = i, error = %e, "transport error, trying next provider");
                    last_transport = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "rpc timeout, trying next provider");
                    last_transport = Some("request timed out".to_string());
                }
            }
        }
        metrics::record_rpc_failure("eth_getTransactionCount");
        Err(all_providers_failed(last_transport))
    }

    async fn gas_price(&self) -> EngineResult<u128> {
        let mut last_transport = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_gas_price();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(price)) => return Ok(price),
                Ok(Err(e)) => {
                    if let Some(err) = node_error(&e) {
                        return Err(err);
                    }
                    tracing::warn!(provider_idx = i, error = %e, "transport error, trying next provider");
                    last_transport = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "rpc timeout, trying next provider");
                    last_transport = Some("request timed out".to_string());
                }
            }
        }
        metrics::record_rpc_failure("eth_gasPrice");
        Err(all_providers_failed(last_transport))
    }

    async fn chain_id(&self) -> EngineResult<u64> {
        let mut last_transport = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(id)) => return Ok(id),
                Ok(Err(e)) => {
                    if let Some(err) = node_error(&e) {
                        return Err(err);
                    }
                    tracing::warn!(provider_idx = i, error = %e, "transport error, trying next provider");
                    last_transport = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "rpc timeout, trying next provider");
                    last_transport = Some("request timed out".to_string());
                }
            }
        }
        metrics::record_rpc_failure("eth_chainId");
        Err(all_providers_failed(last_transport))
    }

    async fn block_number(&self) -> EngineResult<u64> {
        let mut last_transport = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(number)) => return Ok(number),
                Ok(Err(e)) => {
                    if let Some(err) = node_error(&e) {
                        return Err(err);
                    }
                    tracing::warn!(provider_idx = i, error = %e, "transport error, trying next provider");
                    last_transport = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "rpc timeout, trying next provider");
                    last_transport = Some("request timed out".to_string());
                }
            }
        }
        metrics::record_rpc_failure("eth_blockNumber");
        Err(all_providers_failed(last_transport))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> EngineResult<TxHash> {
        let mut last_transport = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.send_raw_transaction(raw);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(pending)) => return Ok(*pending.tx_hash()),
                Ok(Err(e)) => {
                    if let Some(payload) = e.as_error_resp() {
                        // A byte-identical resubmission is idempotent; the
                        // hash is fully determined by the payload.
                        if is_already_known(&payload.message) {
                            tracing::debug!(provider_idx = i, "node already knows this transaction");
                            return Ok(keccak256(raw));
                        }
                        return Err(classify_submit_rejection(payload.code, &payload.message));
                    }
                    tracing::warn!(provider_idx = i, error = %e, "transport error, trying next provider");
                    last_transport = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "rpc timeout, trying next provider");
                    last_transport = Some("request timed out".to_string());
                }
            }
        }
        metrics::record_rpc_failure("eth_sendRawTransaction");
        Err(all_providers_failed(last_transport))
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> EngineResult<Option<Receipt>> {
        let mut last_transport = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(receipt)) => {
                    return Ok(receipt.map(|r| Receipt {
                        tx_hash: r.transaction_hash,
                        success: r.status(),
                        gas_used: r.gas_used,
                        block_number: r.block_number.unwrap_or_default(),
                        block_hash: r.block_hash.unwrap_or_default(),
                    }))
                }
                Ok(Err(e)) => {
                    if let Some(err) = node_error(&e) {
                        return Err(err);
                    }
                    tracing::warn!(provider_idx = i, error = %e, "transport error, trying next provider");
                    last_transport = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "rpc timeout, trying next provider");
                    last_transport = Some("request timed out".to_string());
                }
            }
        }
        metrics::record_rpc_failure("eth_getTransactionReceipt");
        Err(all_providers_failed(last_transport))
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("providers", &self.providers.len())
            .field("expected_chain_id", &self.expected_chain_id)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

/// Extract a node-level JSON-RPC error, if the failure is one.
fn node_error(err: &RpcError<TransportErrorKind>) -> Option<EngineError> {
    err.as_error_resp().map(|payload| EngineError::Node {
        code: payload.code,
        message: payload.message.to_string(),
    })
}

fn all_providers_failed(last: Option<String>) -> EngineError {
    EngineError::Transport(format!(
        "all providers failed: {}",
        last.unwrap_or_else(|| "no providers configured".to_string())
    ))
}

/// Whether the node reports it already holds this exact transaction.
pub(crate) fn is_already_known(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("already known") || lower.contains("alreadyknown")
}

/// Map a submission rejection onto the distinct corrective-action variants.
///
/// The message strings follow go-ethereum's txpool vocabulary, which most
/// EVM endpoints reuse.
pub(crate) fn classify_submit_rejection(code: i64, message: &str) -> EngineError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("nonce too low")
        || lower.contains("nonce too high")
        || lower.contains("replacement transaction")
    {
        EngineError::NonceConflict(message.to_string())
    } else if lower.contains("insufficient funds") {
        EngineError::InsufficientFunds(message.to_string())
    } else if lower.contains("underpriced") {
        EngineError::Underpriced(message.to_string())
    } else if lower.contains("rlp") || lower.contains("decode") || lower.contains("oversized") {
        EngineError::Encoding(message.to_string())
    } else {
        EngineError::Node {
            code,
            message: message.to_string(),
        }
    }
}
