//! Shared scripted mock node for integration tests.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy::primitives::{keccak256, Address, TxHash, B256};
use async_trait::async_trait;

use tx_submitter::rpc::{NodeClient, Receipt};
use tx_submitter::tx::types::SignedTx;
use tx_submitter::{EngineError, EngineResult};

/// Mock node with scripted responses.
///
/// - Pending nonce = `base_nonce` + number of accepted submissions, the
///   way a real pending view counts queued transactions from the sender.
/// - Receipt polls walk `receipt_script` and then repeat its last entry.
/// - Submissions echo the canonical hash, after checking the embedded
///   chain id the way a real node does.
pub struct MockNode {
    chain_id: u64,
    gas_price: u128,
    base_nonce: u64,
    nonce_read_delay: Duration,
    head: AtomicU64,
    head_step: u64,
    receipt_script: Vec<Option<Receipt>>,
    receipt_polls: AtomicUsize,
    transport_failures: AtomicU32,
    pub submitted: Mutex<Vec<Vec<u8>>>,
}

#[allow(dead_code)]
impl MockNode {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            gas_price: 20_000_000_000,
            base_nonce: 0,
            nonce_read_delay: Duration::from_millis(0),
            head: AtomicU64::new(0),
            head_step: 0,
            receipt_script: Vec::new(),
            receipt_polls: AtomicUsize::new(0),
            transport_failures: AtomicU32::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_gas_price(mut self, price_wei: u128) -> Self {
        self.gas_price = price_wei;
        self
    }

    pub fn with_base_nonce(mut self, nonce: u64) -> Self {
        self.base_nonce = nonce;
        self
    }

    /// Widen the window between reading the pending nonce and submitting,
    /// so unserialized concurrent submissions would collide.
    pub fn with_nonce_read_delay(mut self, delay: Duration) -> Self {
        self.nonce_read_delay = delay;
        self
    }

    /// Head block number, advancing by `step` on every query.
    pub fn with_head(self, start: u64, step: u64) -> Self {
        self.head.store(start, Ordering::SeqCst);
        Self {
            head_step: step,
            ..self
        }
    }

    /// Responses for consecutive receipt polls; the last entry repeats.
    pub fn with_receipt_script(mut self, script: Vec<Option<Receipt>>) -> Self {
        self.receipt_script = script;
        self
    }

    /// Fail the first `n` receipt polls with a transport error.
    pub fn with_transport_failures(self, n: u32) -> Self {
        self.transport_failures.store(n, Ordering::SeqCst);
        self
    }

    /// Nonces recovered from every accepted submission.
    pub fn submitted_nonces(&self) -> Vec<u64> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|raw| SignedTx::decode(raw).unwrap().nonce)
            .collect()
    }
}

#[async_trait]
impl NodeClient for MockNode {
    async fn pending_nonce(&self, _address: Address) -> EngineResult<u64> {
        let nonce = self.base_nonce + self.submitted.lock().unwrap().len() as u64;
        if !self.nonce_read_delay.is_zero() {
            tokio::time::sleep(self.nonce_read_delay).await;
        }
        Ok(nonce)
    }

    async fn gas_price(&self) -> EngineResult<u128> {
        Ok(self.gas_price)
    }

    async fn chain_id(&self) -> EngineResult<u64> {
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> EngineResult<u64> {
        Ok(self.head.fetch_add(self.head_step, Ordering::SeqCst))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> EngineResult<TxHash> {
        let decoded = SignedTx::decode(raw)
            .map_err(|_| EngineError::Encoding("undecodable payload".to_string()))?;
        if decoded.chain_id != Some(self.chain_id) {
            return Err(EngineError::Node {
                code: -32000,
                message: format!(
                    "invalid chain id for signer: have {:?} want {}",
                    decoded.chain_id, self.chain_id
                ),
            });
        }
        self.submitted.lock().unwrap().push(raw.to_vec());
        Ok(keccak256(raw))
    }

    async fn transaction_receipt(&self, _tx_hash: TxHash) -> EngineResult<Option<Receipt>> {
        let remaining = self.transport_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transport_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(EngineError::Transport("connection reset".to_string()));
        }

        if self.receipt_script.is_empty() {
            return Ok(None);
        }
        let i = self.receipt_polls.fetch_add(1, Ordering::SeqCst);
        let idx = i.min(self.receipt_script.len() - 1);
        Ok(self.receipt_script[idx].clone())
    }
}

#[allow(dead_code)]
pub fn success_receipt(tx_hash: TxHash, block_number: u64) -> Receipt {
    Receipt {
        tx_hash,
        success: true,
        gas_used: 21_000,
        block_number,
        block_hash: B256::repeat_byte(0xbb),
    }
}

#[allow(dead_code)]
pub fn failed_receipt(tx_hash: TxHash, block_number: u64) -> Receipt {
    Receipt {
        tx_hash,
        success: false,
        gas_used: 30_000,
        block_number,
        block_hash: B256::repeat_byte(0xbb),
    }
}
