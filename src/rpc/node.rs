//! The node operations the submission engine depends on.

use alloy::primitives::{Address, TxHash, B256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Receipt view for a mined transaction.
///
/// Absence of a receipt means "not yet observed", never "failed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Hash of the transaction this receipt belongs to.
    pub tx_hash: TxHash,

    /// Whether execution succeeded. A mined-but-reverted transaction has a
    /// receipt with `success == false`.
    pub success: bool,

    /// Gas consumed by execution.
    pub gas_used: u64,

    /// Number of the including block.
    pub block_number: u64,

    /// Hash of the including block.
    pub block_hash: B256,
}

/// Chain state reads and transaction submission against a node.
///
/// The engine holds this as a trait object so integration tests can script
/// a mock node. No method retries internally; errors propagate classified
/// but uninterpreted.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Nonce from the node's *pending* view, including not-yet-mined
    /// transactions from the same sender.
    async fn pending_nonce(&self, address: Address) -> EngineResult<u64>;

    /// Suggested gas price in wei.
    async fn gas_price(&self) -> EngineResult<u128>;

    /// The node's chain identifier.
    async fn chain_id(&self) -> EngineResult<u64>;

    /// Current head block number.
    async fn block_number(&self) -> EngineResult<u64>;

    /// Submit a canonical signed transaction encoding. Returns the
    /// transaction hash; a node that already knows the byte-identical
    /// payload reports success.
    async fn send_raw_transaction(&self, raw: &[u8]) -> EngineResult<TxHash>;

    /// Receipt lookup by transaction hash. `None` until the transaction is
    /// observed in a block known to this node.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> EngineResult<Option<Receipt>>;
}
