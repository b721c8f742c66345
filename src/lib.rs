//! EVM Transaction Submission Engine
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌────────────────────────────────────────────────────┐
//!                │                     ENGINE                          │
//!                │                                                     │
//!   caller ──────┼─▶ per-sender lock ─▶ rpc (pending nonce, gas price) │
//!                │          │                                          │
//!                │          ▼                                          │
//!                │     tx::builder ─▶ wallet (sign) ─▶ tx::broadcast ──┼──▶ node
//!                │                                                     │
//!   caller ◀─────┼── tx::tracker (poll receipts, backoff, deadline) ◀──┼─── node
//!                │                                                     │
//!                │  ┌───────────────────────────────────────────────┐  │
//!                │  │  config · observability · resilience · error  │  │
//!                │  └───────────────────────────────────────────────┘  │
//!                └────────────────────────────────────────────────────┘
//! ```
//!
//! The wallet is the trust boundary: the only module that touches key
//! material, which enters through a zeroed-on-release handle. All chain
//! state (nonces, receipts) lives in the remote node; the engine persists
//! nothing.

// Core lifecycle
pub mod engine;
pub mod rpc;
pub mod tx;
pub mod wallet;

// Collaborators
pub mod contract;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod observability;
pub mod resilience;

pub use config::EngineConfig;
pub use engine::{Engine, SubmittedTx};
pub use error::{EngineError, EngineResult};
pub use rpc::{BlockSummary, NodeClient, Receipt, RpcClient};
pub use tx::{ConfirmationTracker, TrackerConfig, TxStatus};
pub use wallet::{KeyMaterial, Wallet, PRIVATE_KEY_ENV_VAR};
