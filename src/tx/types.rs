//! Transaction value objects.
//!
//! `UnsignedTx` and `SignedTx` are immutable once constructed. The signed
//! form carries the canonical wire encoding; its keccak-256 hash is the
//! transaction's permanent identifier.

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{SignableTransaction, Transaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::{Decodable2718, Encodable2718};
use alloy::primitives::{Address, Bytes, Signature, TxKind, B256, U256};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Intrinsic gas of a plain value transfer; the protocol minimum for any
/// transaction.
pub const MIN_TRANSFER_GAS: u64 = 21_000;

/// Gas limit and unit price for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasParams {
    /// Unit cap on computation.
    pub limit: u64,
    /// Unit cost in wei.
    pub price_wei: u128,
}

/// A validated, unsigned transaction bound to one chain.
///
/// Constructed only through [`crate::tx::builder::build`], which enforces
/// the parameter invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTx {
    inner: TxLegacy,
}

impl UnsignedTx {
    pub(crate) fn from_validated(inner: TxLegacy) -> Self {
        Self { inner }
    }

    pub fn nonce(&self) -> u64 {
        self.inner.nonce
    }

    /// Recipient, or `None` for contract creation.
    pub fn to(&self) -> Option<Address> {
        match self.inner.to {
            TxKind::Call(address) => Some(address),
            TxKind::Create => None,
        }
    }

    pub fn value(&self) -> U256 {
        self.inner.value
    }

    pub fn gas(&self) -> GasParams {
        GasParams {
            limit: self.inner.gas_limit,
            price_wei: self.inner.gas_price,
        }
    }

    /// Chain id the signature will be bound to. The builder always sets it.
    pub fn chain_id(&self) -> u64 {
        self.inner.chain_id.unwrap_or_default()
    }

    pub fn input(&self) -> &Bytes {
        &self.inner.input
    }

    /// Keccak-256 of the EIP-155 pre-signing encoding. This is the exact
    /// message the wallet signs; it embeds the chain id.
    pub fn signature_hash(&self) -> B256 {
        self.inner.signature_hash()
    }

    /// Attach a signature and serialize the canonical signed encoding.
    pub(crate) fn with_signature(&self, signature: Signature) -> SignedTx {
        let signed = self.inner.clone().into_signed(signature);
        let hash = *signed.hash();
        SignedTx {
            hash,
            raw: signed.encoded_2718().into(),
            nonce: self.nonce(),
            chain_id: self.chain_id(),
        }
    }
}

/// A signed transaction in its canonical wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    hash: B256,
    raw: Bytes,
    nonce: u64,
    chain_id: u64,
}

impl SignedTx {
    /// Keccak-256 of the raw encoding; the permanent identifier once the
    /// node accepts the transaction.
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Canonical signed encoding.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Parse a canonical signed encoding and recover the signer.
    pub fn decode(raw: &[u8]) -> EngineResult<DecodedTx> {
        let envelope = TxEnvelope::decode_2718_exact(raw)
            .map_err(|e| EngineError::Encoding(format!("not a canonical transaction: {e}")))?;

        let sender = envelope
            .recover_signer()
            .map_err(|_| EngineError::Encoding("signature recovery failed".to_string()))?;

        let to = match envelope.kind() {
            TxKind::Call(address) => Some(address),
            TxKind::Create => None,
        };

        Ok(DecodedTx {
            sender,
            to,
            nonce: envelope.nonce(),
            value: envelope.value(),
            gas_limit: envelope.gas_limit(),
            gas_price: envelope.gas_price().unwrap_or_default(),
            chain_id: envelope.chain_id(),
            input: envelope.input().clone(),
        })
    }
}

/// Fields recovered from a canonical signed encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTx {
    /// Address recovered from the signature.
    pub sender: Address,
    pub to: Option<Address>,
    pub nonce: u64,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: Option<u64>,
    pub input: Bytes,
}
