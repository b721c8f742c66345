//! Counter contract bindings.
//!
//! The ABI encoder is a collaborator of the engine, not part of it: the
//! engine carries whatever these helpers produce as opaque call data.

use alloy::primitives::{Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::error::{EngineError, EngineResult};

sol! {
    interface Counter {
        function getCount() external view returns (uint256);
        function increment() external;
    }
}

/// Gas budget for `increment()`; generous for a single storage write.
pub const INCREMENT_GAS_LIMIT: u64 = 300_000;

/// Call data for the state-mutating `increment()`.
pub fn increment_call_data() -> Bytes {
    Counter::incrementCall {}.abi_encode().into()
}

/// Call data for the read-only `getCount()`.
pub fn get_count_call_data() -> Bytes {
    Counter::getCountCall {}.abi_encode().into()
}

/// Decode the `getCount()` return value.
pub fn decode_count(data: &[u8]) -> EngineResult<U256> {
    Counter::getCountCall::abi_decode_returns(data)
        .map_err(|e| EngineError::Encoding(format!("counter return decoding failed: {e}")))
}
