//! Node RPC subsystem.
//!
//! # Data Flow
//! ```text
//! node.rs    - the operations the engine needs from a node (trait + receipt view)
//! client.rs  - concrete JSON-RPC client: timeouts, failover, error classification
//! inspect.rs - read-only block metadata summary (consumer of the same client)
//! ```
//!
//! # Design Decisions
//! - The engine depends on the `NodeClient` trait, never on the concrete
//!   client, so tests substitute a scripted mock node
//! - Transport failures rotate to the next provider; node-level JSON-RPC
//!   errors return immediately (a second provider would answer the same)
//! - No retries here: retry policy belongs to the confirmation tracker

pub mod client;
pub mod inspect;
pub mod node;

pub use client::RpcClient;
pub use inspect::BlockSummary;
pub use node::{NodeClient, Receipt};
