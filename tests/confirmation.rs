//! Confirmation tracker state machine against a scripted mock node.

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::TxHash;

use tx_submitter::rpc::NodeClient;
use tx_submitter::tx::tracker::Cancel;
use tx_submitter::{ConfirmationTracker, TrackerConfig, TxStatus};

mod common;
use common::{failed_receipt, success_receipt, MockNode};

fn fast_config(depth: u32, deadline: Duration) -> TrackerConfig {
    TrackerConfig {
        confirmation_depth: depth,
        poll_interval: Duration::from_millis(20),
        deadline,
        backoff_base_ms: 1,
        backoff_max_ms: 5,
    }
}

fn tracker(mock: &Arc<MockNode>, config: TrackerConfig) -> ConfirmationTracker {
    let client: Arc<dyn NodeClient> = mock.clone();
    ConfirmationTracker::new(client, config)
}

fn tx_hash() -> TxHash {
    TxHash::repeat_byte(0xaa)
}

#[tokio::test]
async fn walks_pending_included_confirmed() {
    let hash = tx_hash();
    // First poll sees nothing; then the receipt appears at block 10 and
    // the head advances one block per query until depth 2 is reached.
    let mock = Arc::new(
        MockNode::new(31337)
            .with_head(10, 1)
            .with_receipt_script(vec![None, Some(success_receipt(hash, 10))]),
    );

    let status = tracker(&mock, fast_config(2, Duration::from_secs(5)))
        .track(hash)
        .await
        .unwrap();

    assert_eq!(
        status,
        TxStatus::Confirmed {
            block_number: 10,
            gas_used: 21_000
        }
    );
}

#[tokio::test]
async fn drops_when_no_receipt_before_deadline() {
    // Empty script: the node never sees the transaction. Deadline spans
    // five poll cycles.
    let mock = Arc::new(MockNode::new(31337));

    let started = Instant::now();
    let status = tracker(&mock, fast_config(1, Duration::from_millis(100)))
        .track(tx_hash())
        .await
        .unwrap();

    assert_eq!(status, TxStatus::Dropped);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn reports_reverted_execution_as_failed() {
    let hash = tx_hash();
    let mock = Arc::new(
        MockNode::new(31337)
            .with_head(10, 1)
            .with_receipt_script(vec![Some(failed_receipt(hash, 10))]),
    );

    let status = tracker(&mock, fast_config(2, Duration::from_secs(5)))
        .track(hash)
        .await
        .unwrap();

    assert_eq!(status, TxStatus::Failed { block_number: 10 });
}

#[tokio::test]
async fn reorged_receipt_falls_back_to_pending_then_reconfirms() {
    let hash = tx_hash();
    // Included at block 10, receipt disappears (reorg), then reappears
    // and reaches depth 1.
    let mock = Arc::new(MockNode::new(31337).with_head(10, 1).with_receipt_script(vec![
        Some(success_receipt(hash, 10)),
        None,
        Some(success_receipt(hash, 10)),
    ]));

    let status = tracker(&mock, fast_config(1, Duration::from_secs(5)))
        .track(hash)
        .await
        .unwrap();

    assert_eq!(
        status,
        TxStatus::Confirmed {
            block_number: 10,
            gas_used: 21_000
        }
    );
}

#[tokio::test]
async fn cancellation_detaches_without_terminal_state() {
    let mock = Arc::new(MockNode::new(31337));
    let cancel = Cancel::new();
    let receiver = cancel.subscribe();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.trigger();
    });

    let started = Instant::now();
    let status = tracker(&mock, fast_config(1, Duration::from_secs(30)))
        .track_with_cancel(tx_hash(), receiver)
        .await
        .unwrap();

    // Still pending locally; the wait detached long before the deadline.
    assert_eq!(status, TxStatus::Pending);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn transport_errors_are_retried_within_deadline() {
    let hash = tx_hash();
    let mock = Arc::new(
        MockNode::new(31337)
            .with_head(10, 1)
            .with_transport_failures(2)
            .with_receipt_script(vec![Some(success_receipt(hash, 10))]),
    );

    let status = tracker(&mock, fast_config(0, Duration::from_secs(5)))
        .track(hash)
        .await
        .unwrap();

    assert_eq!(
        status,
        TxStatus::Confirmed {
            block_number: 10,
            gas_used: 21_000
        }
    );
}

#[tokio::test]
async fn independent_tracks_do_not_interfere() {
    let hash_a = TxHash::repeat_byte(0x01);
    let hash_b = TxHash::repeat_byte(0x02);

    // One node confirms immediately, the other never answers.
    let confirming = Arc::new(
        MockNode::new(31337)
            .with_head(10, 1)
            .with_receipt_script(vec![Some(success_receipt(hash_a, 10))]),
    );
    let silent = Arc::new(MockNode::new(31337));

    let (confirmed, dropped) = tokio::join!(
        tracker(&confirming, fast_config(0, Duration::from_secs(5))).track(hash_a),
        tracker(&silent, fast_config(0, Duration::from_millis(100))).track(hash_b),
    );

    assert!(matches!(confirmed.unwrap(), TxStatus::Confirmed { .. }));
    assert_eq!(dropped.unwrap(), TxStatus::Dropped);
}
