//! Transaction lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! chain state (nonce, gas price, chain id)
//!     → builder.rs  (validate & assemble UnsignedTx, pure)
//!     → wallet      (sign → SignedTx, canonical encoding)
//!     → broadcast.rs (submit, distinct rejection variants)
//!     → tracker.rs  (poll receipt to a terminal state)
//! ```

pub mod broadcast;
pub mod builder;
pub mod tracker;
pub mod types;

pub use broadcast::Broadcaster;
pub use tracker::{Cancel, ConfirmationTracker, TrackerConfig, TxStatus};
pub use types::{GasParams, SignedTx, UnsignedTx};
