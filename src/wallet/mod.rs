//! Wallet: key handling and transaction signing.
//!
//! # Security
//! - Key material enters only through [`KeyMaterial`] (zeroed on release)
//! - The key is never logged, serialized, or part of any error message
//! - Signing is deterministic (RFC 6979); no per-signature randomness that
//!   could leak the key through signature-nonce reuse
//! - The signature is bound to one chain id (EIP-155); signing a
//!   transaction built for a different chain is refused

pub mod keys;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::error::{EngineError, EngineResult};
use crate::tx::types::{SignedTx, UnsignedTx};

pub use keys::KeyMaterial;

/// Environment variable the demo binary reads the private key from.
pub const PRIVATE_KEY_ENV_VAR: &str = "TX_SUBMITTER_PRIVATE_KEY";

/// Signing wallet bound to a single chain.
pub struct Wallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl Wallet {
    /// Build a wallet from key material. The handle can be dropped as soon
    /// as this returns; the wallet owns its own copy inside the signer.
    pub fn new(key: &KeyMaterial, chain_id: u64) -> EngineResult<Self> {
        let signer = PrivateKeySigner::from_slice(key.expose())
            .map_err(|_| EngineError::Signing("malformed private key material".to_string()))?;

        tracing::info!(
            address = %signer.address(),
            chain_id,
            "wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Load the key from an environment variable.
    pub fn from_env(var: &str, chain_id: u64) -> EngineResult<Self> {
        let key = KeyMaterial::from_env(var)?;
        Self::new(&key, chain_id)
    }

    /// The address derived from this wallet's public key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The chain id this wallet signs for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign a built transaction, producing the canonical signed encoding.
    ///
    /// Never partially signs: either the full signed transaction is
    /// returned or nothing was produced.
    pub fn sign(&self, tx: &UnsignedTx) -> EngineResult<SignedTx> {
        if tx.chain_id() != self.chain_id {
            return Err(EngineError::ChainMismatch {
                expected: self.chain_id,
                actual: tx.chain_id(),
            });
        }

        let sig_hash = tx.signature_hash();
        let signature = self
            .signer
            .sign_hash_sync(&sig_hash)
            .map_err(|e| EngineError::Signing(e.to_string()))?;

        Ok(tx.with_signature(signature))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.signer.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
