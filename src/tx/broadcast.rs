//! Signed-transaction submission.
//!
//! # Design Decisions
//! - No automatic retries: a rejected submission needs changed inputs, and
//!   retry policy for transport failures belongs to the caller
//! - Byte-identical resubmission is safe; the node client reports an
//!   "already known" answer as success

use std::sync::Arc;

use alloy::primitives::TxHash;

use crate::error::EngineResult;
use crate::observability::metrics;
use crate::rpc::node::NodeClient;
use crate::tx::types::SignedTx;

/// Submits signed transactions to the node.
pub struct Broadcaster {
    client: Arc<dyn NodeClient>,
}

impl Broadcaster {
    pub fn new(client: Arc<dyn NodeClient>) -> Self {
        Self { client }
    }

    /// Submit the canonical encoding and return the transaction hash.
    ///
    /// Rejections surface with their distinct variants (nonce conflict,
    /// insufficient funds, underpriced, malformed encoding); each implies
    /// a different corrective action by the caller.
    pub async fn submit(&self, tx: &SignedTx) -> EngineResult<TxHash> {
        match self.client.send_raw_transaction(tx.raw()).await {
            Ok(hash) => {
                if hash != tx.hash() {
                    // The hash is keccak-256 of the bytes we sent; a node
                    // answering differently is misbehaving.
                    tracing::warn!(
                        expected = %tx.hash(),
                        actual = %hash,
                        "node returned unexpected transaction hash"
                    );
                }
                metrics::record_submission("accepted");
                tracing::info!(tx_hash = %hash, nonce = tx.nonce(), "transaction broadcast");
                Ok(hash)
            }
            Err(e) => {
                metrics::record_submission("rejected");
                tracing::warn!(tx_hash = %tx.hash(), nonce = tx.nonce(), error = %e, "submission rejected");
                Err(e)
            }
        }
    }
}
