//! Scoped private-key material.
//!
//! # Security
//! - Backing memory is zeroed on release, on every exit path
//! - Key bytes never appear in errors, logs, or Debug output
//! - Callers hand the handle to the wallet and drop it; nothing else
//!   should hold raw key bytes

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{EngineError, EngineResult};

/// A secp256k1 private key held in memory that zeroes itself on drop.
#[derive(ZeroizeOnDrop)]
pub struct KeyMaterial {
    bytes: Vec<u8>,
}

impl KeyMaterial {
    /// Wrap raw key bytes. The caller's copy should be zeroed or dropped
    /// immediately after this call.
    pub fn from_bytes(bytes: Vec<u8>) -> EngineResult<Self> {
        if bytes.len() != 32 {
            let mut bytes = bytes;
            bytes.zeroize();
            return Err(EngineError::Signing(
                "private key must be exactly 32 bytes".to_string(),
            ));
        }
        Ok(Self { bytes })
    }

    /// Parse a hex-encoded key (with or without `0x` prefix).
    pub fn from_hex(hex_key: &str) -> EngineResult<Self> {
        let trimmed = hex_key.strip_prefix("0x").unwrap_or(hex_key);
        let decoded = alloy::primitives::hex::decode(trimmed)
            .map_err(|_| EngineError::Signing("private key is not valid hex".to_string()))?;
        Self::from_bytes(decoded)
    }

    /// Read the key from an environment variable.
    pub fn from_env(var: &str) -> EngineResult<Self> {
        let mut raw = std::env::var(var).map_err(|_| {
            EngineError::Signing(format!("environment variable {} not set", var))
        })?;
        let material = Self::from_hex(&raw);
        raw.zeroize();
        material
    }

    /// Expose the key bytes for the duration of a signing-key construction.
    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial(..)")
    }
}
