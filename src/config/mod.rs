//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EngineConfig (validated, immutable)
//!     → each component receives only the section it needs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - No process-wide settings object: constructors take explicit sections
//! - Secrets (the private key) never live in config files; they come from
//!   the environment through the wallet's key handle

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ConfirmationConfig;
pub use schema::EngineConfig;
pub use schema::GasConfig;
pub use schema::NodeConfig;
