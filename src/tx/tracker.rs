//! Confirmation tracking.
//!
//! # State Machine
//! ```text
//! Pending ──receipt──▶ Included ──depth reached──▶ Confirmed (terminal)
//!    ▲                    │ │
//!    └──receipt gone──────┘ └──status failure──▶ Failed (terminal)
//! Pending ──deadline──▶ Dropped (terminal)
//! ```
//!
//! # Design Decisions
//! - The receipt is re-checked on every poll; an including block can be
//!   reorganized away, which sends the state back to Pending
//! - Transport errors back off exponentially (jittered, capped) and count
//!   against the deadline; node errors propagate
//! - Cancellation detaches the local observer only; the transaction's
//!   on-chain fate is unaffected
//! - No locks are held anywhere in the loop; tracking many transactions
//!   concurrently is just many independent tasks

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

use crate::config::schema::ConfirmationConfig;
use crate::error::EngineResult;
use crate::observability::metrics;
use crate::resilience::Backoff;
use crate::rpc::node::NodeClient;

/// Observed state of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Hash known, no receipt observed yet.
    Pending,
    /// A receipt exists in some block; not yet at confirmation depth.
    Included { block_number: u64 },
    /// Success receipt at the configured depth. Terminal.
    Confirmed { block_number: u64, gas_used: u64 },
    /// Mined but execution failed (reverted). Terminal.
    Failed { block_number: u64 },
    /// Deadline elapsed with no receipt; the pool may have discarded the
    /// transaction. Terminal; resubmission is the caller's decision.
    Dropped,
}

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TxStatus::Confirmed { .. } | TxStatus::Failed { .. } | TxStatus::Dropped
        )
    }
}

/// Tracker timing and depth settings.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Blocks required on top of the including block.
    pub confirmation_depth: u32,
    /// Receipt polling interval.
    pub poll_interval: Duration,
    /// Overall deadline; mandatory.
    pub deadline: Duration,
    /// Transport-error backoff base.
    pub backoff_base_ms: u64,
    /// Transport-error backoff cap.
    pub backoff_max_ms: u64,
}

impl From<&ConfirmationConfig> for TrackerConfig {
    fn from(config: &ConfirmationConfig) -> Self {
        Self {
            confirmation_depth: config.depth,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            deadline: Duration::from_secs(config.deadline_secs),
            backoff_base_ms: config.backoff_base_ms,
            backoff_max_ms: config.backoff_max_ms,
        }
    }
}

/// Cancellation coordinator for confirmation waits.
///
/// Dropping all receivers is harmless; triggering detaches every
/// subscribed wait at its next loop iteration.
pub struct Cancel {
    tx: broadcast::Sender<()>,
}

impl Cancel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Cancel {
    fn default() -> Self {
        Self::new()
    }
}

/// Polls a transaction to a terminal state.
pub struct ConfirmationTracker {
    client: Arc<dyn NodeClient>,
    config: TrackerConfig,
}

impl ConfirmationTracker {
    pub fn new(client: Arc<dyn NodeClient>, config: TrackerConfig) -> Self {
        Self { client, config }
    }

    /// Track without external cancellation; the deadline still bounds the
    /// wait.
    pub async fn track(&self, tx_hash: TxHash) -> EngineResult<TxStatus> {
        let cancel = Cancel::new();
        self.track_with_cancel(tx_hash, cancel.subscribe()).await
    }

    /// Track until a terminal state, the deadline, or cancellation.
    ///
    /// Returns the last observed status on cancellation (an explicit
    /// "still pending" answer) rather than blocking further; on deadline
    /// with no receipt ever observed, returns [`TxStatus::Dropped`].
    pub async fn track_with_cancel(
        &self,
        tx_hash: TxHash,
        mut cancel: broadcast::Receiver<()>,
    ) -> EngineResult<TxStatus> {
        let deadline = Instant::now() + self.config.deadline;
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut backoff = Backoff::new(self.config.backoff_base_ms, self.config.backoff_max_ms);
        let mut status = TxStatus::Pending;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = sleep_until(deadline) => {}
                _ = cancel.recv() => {
                    tracing::debug!(
                        tx_hash = %tx_hash,
                        status = ?status,
                        "confirmation wait cancelled; transaction remains in flight"
                    );
                    return Ok(status);
                }
            }

            if Instant::now() >= deadline {
                return Ok(self.conclude_at_deadline(tx_hash, status));
            }

            match self.client.transaction_receipt(tx_hash).await {
                Err(e) if e.is_retryable() => {
                    let delay = backoff.next_delay();
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "transport error while polling receipt; backing off"
                    );
                    sleep_until((Instant::now() + delay).min(deadline)).await;
                }
                Err(e) => return Err(e),
                Ok(None) => {
                    backoff.reset();
                    if let TxStatus::Included { block_number } = status {
                        tracing::warn!(
                            tx_hash = %tx_hash,
                            block_number,
                            "receipt disappeared; including block reorganized away"
                        );
                        status = TxStatus::Pending;
                    }
                }
                Ok(Some(receipt)) => {
                    backoff.reset();
                    if !receipt.success {
                        metrics::record_tracking_outcome("failed");
                        tracing::warn!(
                            tx_hash = %tx_hash,
                            block_number = receipt.block_number,
                            "transaction reverted"
                        );
                        return Ok(TxStatus::Failed {
                            block_number: receipt.block_number,
                        });
                    }

                    status = TxStatus::Included {
                        block_number: receipt.block_number,
                    };

                    let head = match self.client.block_number().await {
                        Ok(head) => head,
                        Err(e) if e.is_retryable() => {
                            let delay = backoff.next_delay();
                            tracing::warn!(
                                tx_hash = %tx_hash,
                                error = %e,
                                "transport error reading head; backing off"
                            );
                            sleep_until((Instant::now() + delay).min(deadline)).await;
                            continue;
                        }
                        Err(e) => return Err(e),
                    };

                    let confirmations = head.saturating_sub(receipt.block_number);
                    if confirmations >= u64::from(self.config.confirmation_depth) {
                        metrics::record_tracking_outcome("confirmed");
                        tracing::info!(
                            tx_hash = %tx_hash,
                            block_number = receipt.block_number,
                            confirmations,
                            "transaction confirmed"
                        );
                        return Ok(TxStatus::Confirmed {
                            block_number: receipt.block_number,
                            gas_used: receipt.gas_used,
                        });
                    }

                    tracing::debug!(
                        tx_hash = %tx_hash,
                        confirmations,
                        required = self.config.confirmation_depth,
                        "waiting for confirmation depth"
                    );
                }
            }
        }
    }

    fn conclude_at_deadline(&self, tx_hash: TxHash, status: TxStatus) -> TxStatus {
        match status {
            TxStatus::Pending => {
                metrics::record_tracking_outcome("dropped");
                tracing::warn!(
                    tx_hash = %tx_hash,
                    deadline_secs = self.config.deadline.as_secs(),
                    "no receipt before deadline; transaction presumed dropped"
                );
                TxStatus::Dropped
            }
            // A transaction seen in a block is not droppable; hand the
            // caller the last observation and let them keep waiting.
            other => other,
        }
    }
}
