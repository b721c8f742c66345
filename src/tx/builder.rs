//! Transaction assembly and parameter validation.
//!
//! Pure functions: no I/O, no side effects, fully deterministic for given
//! inputs. Chain binding happens here: the chain id is part of the value
//! object from the moment it exists.

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Bytes, TxKind, U256};

use crate::error::{EngineError, EngineResult};
use crate::tx::types::{GasParams, UnsignedTx, MIN_TRANSFER_GAS};

/// Inputs for building a transaction.
#[derive(Debug, Clone)]
pub struct TxParams {
    /// Recipient, or `None` for contract creation.
    pub to: Option<Address>,
    /// Amount of native token to transfer, in wei.
    pub value: U256,
    pub gas: GasParams,
    /// Fresh pending nonce for the sender.
    pub nonce: u64,
    /// Chain the signature will be bound to.
    pub chain_id: u64,
    /// Opaque call data (empty for a plain transfer).
    pub data: Bytes,
}

/// Validate parameters and assemble an [`UnsignedTx`].
///
/// The gas limit must cover at least the intrinsic transfer cost; a
/// contract call's true requirement cannot be computed statically, so the
/// declared limit is taken as given beyond that floor.
pub fn build(params: TxParams) -> EngineResult<UnsignedTx> {
    if params.gas.price_wei == 0 {
        return Err(EngineError::InvalidParameter(
            "gas price must be positive".to_string(),
        ));
    }
    if params.gas.limit < MIN_TRANSFER_GAS {
        return Err(EngineError::InvalidParameter(format!(
            "gas limit {} below intrinsic minimum {}",
            params.gas.limit, MIN_TRANSFER_GAS
        )));
    }
    if params.chain_id == 0 {
        return Err(EngineError::InvalidParameter(
            "chain id must be non-zero".to_string(),
        ));
    }
    if params.to.is_none() && params.data.is_empty() {
        return Err(EngineError::InvalidParameter(
            "contract creation requires non-empty init code".to_string(),
        ));
    }

    let to = match params.to {
        Some(address) => TxKind::Call(address),
        None => TxKind::Create,
    };

    Ok(UnsignedTx::from_validated(TxLegacy {
        chain_id: Some(params.chain_id),
        nonce: params.nonce,
        gas_price: params.gas.price_wei,
        gas_limit: params.gas.limit,
        to,
        value: params.value,
        input: params.data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> TxParams {
        TxParams {
            to: Some(Address::repeat_byte(0xef)),
            value: U256::from(1_000_000u64),
            gas: GasParams {
                limit: 21_000,
                price_wei: 20_000_000_000,
            },
            nonce: 7,
            chain_id: 11155111,
            data: Bytes::new(),
        }
    }

    #[test]
    fn test_build_preserves_fields() {
        let params = valid_params();
        let tx = build(params.clone()).unwrap();
        assert_eq!(tx.nonce(), 7);
        assert_eq!(tx.to(), params.to);
        assert_eq!(tx.value(), params.value);
        assert_eq!(tx.chain_id(), 11155111);
        assert_eq!(tx.gas(), params.gas);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = build(valid_params()).unwrap();
        let b = build(valid_params()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.signature_hash(), b.signature_hash());
    }

    #[test]
    fn test_zero_gas_price_rejected() {
        let mut params = valid_params();
        params.gas.price_wei = 0;
        assert!(matches!(
            build(params),
            Err(EngineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_low_gas_limit_rejected() {
        let mut params = valid_params();
        params.gas.limit = 20_999;
        let err = build(params).unwrap_err();
        assert!(err.to_string().contains("20999"));
    }

    #[test]
    fn test_creation_without_init_code_rejected() {
        let mut params = valid_params();
        params.to = None;
        assert!(matches!(
            build(params),
            Err(EngineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_creation_with_init_code_allowed() {
        let mut params = valid_params();
        params.to = None;
        params.data = Bytes::from_static(&[0x60, 0x00]);
        let tx = build(params).unwrap();
        assert_eq!(tx.to(), None);
    }

    #[test]
    fn test_call_data_carried_opaquely() {
        let mut params = valid_params();
        params.data = Bytes::from_static(&[0xd0, 0x9d, 0xe0, 0x8a]);
        params.gas.limit = 300_000;
        let tx = build(params).unwrap();
        assert_eq!(tx.input().as_ref(), &[0xd0, 0x9d, 0xe0, 0x8a]);
    }
}
