//! Contract collaborator: positional string arguments in, decoded values out

mod client;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{address, Address, B256};

use crate::error::ContractCallError;

pub use client::{encode_call, AlloyContract};

/// Fixed address of the Panarchy contract
pub const CONTRACT_ADDRESS: Address = address!("0000000000000000000000000000000000000010");

/// Sender and fee for a state-changing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    pub from: Address,
    /// Legacy gas price in wei
    pub gas_price: u128,
}

#[async_trait::async_trait]
pub trait ContractClient: Send + Sync + 'static {
    fn address(&self) -> Address;

    /// Side-effect-free call; returns the decoded outputs
    async fn call(&self, method: &str, args: &[String])
        -> Result<Vec<DynSolValue>, ContractCallError>;

    /// Signed transaction; resolves once mined, with the transaction hash
    async fn send(
        &self,
        method: &str,
        args: &[String],
        options: TxOptions,
    ) -> Result<B256, ContractCallError>;
}
