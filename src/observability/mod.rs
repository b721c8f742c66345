//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All components produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (submission/confirmation/RPC counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic increments); recording without an installed
//!   exporter is a no-op, so the library never requires the endpoint
//! - Secret material is never a log field

pub mod logging;
pub mod metrics;
