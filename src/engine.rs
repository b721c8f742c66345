//! Submission engine: the full lifecycle behind one call.
//!
//! # Data Flow
//! ```text
//! submit_transfer / submit_call
//!     → per-sender sequencing lock (fetch-nonce through broadcast only)
//!     → pending nonce + suggested gas price (chain state reads)
//!     → builder (validate, bind chain id)
//!     → wallet (sign)
//!     → broadcaster (submit, distinct rejections)
//! tracker() → independent confirmation polling, no lock held
//! ```
//!
//! # Concurrency
//! Submissions for different senders proceed fully in parallel over the
//! shared node client. For one sender, two concurrent builds could read
//! the same pending nonce and collide on submission, so the read-to-submit
//! window is a critical section per address. Confirmation tracking never
//! holds the sequencing lock.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, B256, U256};
use dashmap::DashMap;

use crate::config::schema::{EngineConfig, GasConfig};
use crate::error::{EngineError, EngineResult};
use crate::rpc::node::NodeClient;
use crate::tx::broadcast::Broadcaster;
use crate::tx::builder::{self, TxParams};
use crate::tx::tracker::{ConfirmationTracker, TrackerConfig};
use crate::tx::types::{GasParams, MIN_TRANSFER_GAS};
use crate::wallet::Wallet;

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Result of an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmittedTx {
    /// Hash identifying the transaction on chain.
    pub hash: B256,
    /// Nonce the transaction was sequenced at.
    pub nonce: u64,
    /// Gas parameters it was submitted with.
    pub gas: GasParams,
}

/// Drives transactions from chain-state read to broadcast, with per-sender
/// nonce sequencing.
pub struct Engine {
    client: Arc<dyn NodeClient>,
    gas: GasConfig,
    tracker_config: TrackerConfig,
    /// One async mutex per sender address; guards the nonce-read-to-submit
    /// window.
    sequencers: DashMap<Address, Arc<tokio::sync::Mutex<()>>>,
}

impl Engine {
    pub fn new(client: Arc<dyn NodeClient>, gas: GasConfig, tracker_config: TrackerConfig) -> Self {
        Self {
            client,
            gas,
            tracker_config,
            sequencers: DashMap::new(),
        }
    }

    /// Convenience constructor mapping the loaded configuration onto the
    /// engine's sections.
    pub fn from_config(client: Arc<dyn NodeClient>, config: &EngineConfig) -> Self {
        Self::new(
            client,
            config.gas.clone(),
            TrackerConfig::from(&config.confirmation),
        )
    }

    /// Check the node serves the chain the wallet signs for.
    pub async fn verify_chain(&self, wallet: &Wallet) -> EngineResult<()> {
        let actual = self.client.chain_id().await?;
        if actual != wallet.chain_id() {
            return Err(EngineError::ChainMismatch {
                expected: wallet.chain_id(),
                actual,
            });
        }
        Ok(())
    }

    /// Submit a plain value transfer.
    pub async fn submit_transfer(
        &self,
        wallet: &Wallet,
        to: Address,
        value: U256,
    ) -> EngineResult<SubmittedTx> {
        self.submit(wallet, Some(to), value, Bytes::new(), MIN_TRANSFER_GAS)
            .await
    }

    /// Submit a state-mutating contract call with opaque call data.
    ///
    /// The required gas cannot be computed statically; `gas_limit` is the
    /// caller's declared budget.
    pub async fn submit_call(
        &self,
        wallet: &Wallet,
        to: Address,
        data: Bytes,
        gas_limit: u64,
    ) -> EngineResult<SubmittedTx> {
        self.submit(wallet, Some(to), U256::ZERO, data, gas_limit).await
    }

    /// A tracker sharing this engine's node client and confirmation
    /// settings. Independent of any sequencing lock.
    pub fn tracker(&self) -> ConfirmationTracker {
        ConfirmationTracker::new(self.client.clone(), self.tracker_config.clone())
    }

    async fn submit(
        &self,
        wallet: &Wallet,
        to: Option<Address>,
        value: U256,
        data: Bytes,
        gas_limit: u64,
    ) -> EngineResult<SubmittedTx> {
        let sender = wallet.address();

        // Clone the lock out so the map's shard guard is released before
        // any await.
        let lock = self
            .sequencers
            .entry(sender)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();
        let _sequenced = lock.lock().await;

        let nonce = self.client.pending_nonce(sender).await?;
        let price_wei = self.suggested_gas_price().await?;
        let gas = GasParams {
            limit: gas_limit,
            price_wei,
        };

        let unsigned = builder::build(TxParams {
            to,
            value,
            gas,
            nonce,
            chain_id: wallet.chain_id(),
            data,
        })?;
        let signed = wallet.sign(&unsigned)?;

        let hash = Broadcaster::new(self.client.clone()).submit(&signed).await?;
        Ok(SubmittedTx { hash, nonce, gas })
    }

    /// Suggested price with the configured buffer applied, refused above
    /// the ceiling.
    async fn suggested_gas_price(&self) -> EngineResult<u128> {
        let suggested = self.client.gas_price().await?;
        let gwei = suggested / WEI_PER_GWEI;
        if gwei > u128::from(self.gas.max_price_gwei) {
            return Err(EngineError::GasPriceTooHigh {
                current_gwei: gwei,
                max_gwei: self.gas.max_price_gwei,
            });
        }
        let adjusted = (suggested as f64 * self.gas.price_multiplier) as u128;
        Ok(adjusted.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::node::Receipt;
    use alloy::primitives::TxHash;
    use async_trait::async_trait;

    struct FixedPriceNode {
        price: u128,
    }

    #[async_trait]
    impl NodeClient for FixedPriceNode {
        async fn pending_nonce(&self, _address: Address) -> EngineResult<u64> {
            Ok(0)
        }
        async fn gas_price(&self) -> EngineResult<u128> {
            Ok(self.price)
        }
        async fn chain_id(&self) -> EngineResult<u64> {
            Ok(31337)
        }
        async fn block_number(&self) -> EngineResult<u64> {
            Ok(0)
        }
        async fn send_raw_transaction(&self, raw: &[u8]) -> EngineResult<TxHash> {
            Ok(alloy::primitives::keccak256(raw))
        }
        async fn transaction_receipt(&self, _tx_hash: TxHash) -> EngineResult<Option<Receipt>> {
            Ok(None)
        }
    }

    fn engine_with_price(price: u128) -> Engine {
        Engine::new(
            Arc::new(FixedPriceNode { price }),
            GasConfig {
                price_multiplier: 1.5,
                max_price_gwei: 100,
            },
            TrackerConfig::from(&crate::config::schema::ConfirmationConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_gas_price_buffer_applied() {
        let engine = engine_with_price(10 * WEI_PER_GWEI);
        let price = engine.suggested_gas_price().await.unwrap();
        assert_eq!(price, 15 * WEI_PER_GWEI);
    }

    #[tokio::test]
    async fn test_gas_price_ceiling_enforced() {
        let engine = engine_with_price(101 * WEI_PER_GWEI);
        let err = engine.suggested_gas_price().await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::GasPriceTooHigh {
                current_gwei: 101,
                max_gwei: 100
            }
        ));
    }
}
