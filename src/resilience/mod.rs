//! Resilience subsystem.
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every node call has a deadline
//! - Backoff applies only to transport failures during receipt polling,
//!   bounded by the tracker's overall deadline
//! - Jittered backoff prevents synchronized retry bursts

pub mod backoff;

pub use backoff::Backoff;
