//! Read-only block metadata summary.

use alloy::consensus::BlockHeader;
use alloy::primitives::{Address, B256, B64, U256};
use alloy::rpc::types::Block;
use serde::{Deserialize, Serialize};

/// Flattened view of a block's metadata, for inspection output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    /// Unix timestamp of the block.
    pub timestamp: u64,
    pub transaction_count: usize,
    pub miner: Address,
    pub difficulty: U256,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub state_root: B256,
    pub receipts_root: B256,
    pub nonce: B64,
    /// Encoded block size in bytes, when the node reports it.
    pub size: Option<U256>,
}

impl BlockSummary {
    pub(crate) fn from_block(block: &Block) -> Self {
        Self {
            number: block.header.number(),
            hash: block.header.hash,
            parent_hash: block.header.parent_hash(),
            timestamp: block.header.timestamp(),
            transaction_count: block.transactions.len(),
            miner: block.header.beneficiary(),
            difficulty: block.header.difficulty(),
            gas_limit: block.header.gas_limit(),
            gas_used: block.header.gas_used(),
            state_root: block.header.state_root(),
            receipts_root: block.header.receipts_root(),
            nonce: block.header.inner.nonce,
            size: block.header.size,
        }
    }
}

impl std::fmt::Display for BlockSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "block number:      {}", self.number)?;
        writeln!(f, "hash:              {}", self.hash)?;
        writeln!(f, "parent hash:       {}", self.parent_hash)?;
        writeln!(f, "timestamp:         {} (unix)", self.timestamp)?;
        writeln!(f, "transactions:      {}", self.transaction_count)?;
        writeln!(f, "miner:             {}", self.miner)?;
        writeln!(f, "difficulty:        {}", self.difficulty)?;
        writeln!(f, "gas limit:         {}", self.gas_limit)?;
        writeln!(f, "gas used:          {}", self.gas_used)?;
        writeln!(f, "state root:        {}", self.state_root)?;
        writeln!(f, "receipts root:     {}", self.receipts_root)?;
        writeln!(f, "nonce:             {}", self.nonce)?;
        if let Some(size) = self.size {
            writeln!(f, "size:              {} bytes", size)?;
        }
        Ok(())
    }
}
