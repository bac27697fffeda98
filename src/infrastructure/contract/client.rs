//! `ContractClient` over a JSON ABI and the wallet's active alloy provider

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, B256};

use crate::error::ContractCallError;
use crate::infrastructure::abi::parse_value;
use crate::infrastructure::contract::{ContractClient, TxOptions, CONTRACT_ADDRESS};
use crate::infrastructure::wallet::LocalWallet;

pub struct AlloyContract {
    abi: JsonAbi,
    address: Address,
    wallet: Arc<LocalWallet>,
}

impl AlloyContract {
    pub fn new(abi: JsonAbi, wallet: Arc<LocalWallet>) -> Self {
        Self {
            abi,
            address: CONTRACT_ADDRESS,
            wallet,
        }
    }
}

/// Resolve `method` by name and arity, coerce the arguments, and ABI-encode the call
pub fn encode_call<'a>(
    abi: &'a JsonAbi,
    method: &str,
    args: &[String],
) -> Result<(&'a Function, Vec<u8>), ContractCallError> {
    let function = abi
        .function(method)
        .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == args.len()))
        .ok_or_else(|| ContractCallError::UnknownMethod {
            method: method.to_string(),
            arity: args.len(),
        })?;

    let values = function
        .inputs
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (param, arg))| {
            let ty = param.resolve().map_err(|e| ContractCallError::Abi(e.to_string()))?;
            parse_value(&ty, arg).map_err(|reason| ContractCallError::InvalidArgument {
                index: index + 1,
                kind: param.ty.clone(),
                reason,
            })
        })
        .collect::<Result<Vec<DynSolValue>, _>>()?;

    let data = function
        .abi_encode_input(&values)
        .map_err(|e| ContractCallError::Abi(e.to_string()))?;
    Ok((function, data))
}

fn rpc_error(err: impl std::fmt::Display) -> ContractCallError {
    ContractCallError::Rpc(err.to_string())
}

#[async_trait::async_trait]
impl ContractClient for AlloyContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn call(
        &self,
        method: &str,
        args: &[String],
    ) -> Result<Vec<DynSolValue>, ContractCallError> {
        let (function, data) = encode_call(&self.abi, method, args)?;
        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(data);

        let output = self.wallet.provider().call(tx).await.map_err(rpc_error)?;
        tracing::debug!(method, bytes = output.len(), "call returned");

        function.abi_decode_output(&output).map_err(|e| {
            ContractCallError::Abi(format!("Failed to decode {} output: {}", method, e))
        })
    }

    async fn send(
        &self,
        method: &str,
        args: &[String],
        options: TxOptions,
    ) -> Result<B256, ContractCallError> {
        let (_, data) = encode_call(&self.abi, method, args)?;
        let tx = TransactionRequest::default()
            .with_from(options.from)
            .with_to(self.address)
            .with_input(data)
            .with_gas_price(options.gas_price);

        let pending = self
            .wallet
            .provider()
            .send_transaction(tx)
            .await
            .map_err(rpc_error)?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(method, %tx_hash, "transaction sent");

        let receipt = pending.get_receipt().await.map_err(rpc_error)?;
        if !receipt.status() {
            return Err(ContractCallError::Reverted(format!("{:?}", tx_hash)));
        }
        Ok(tx_hash)
    }
}
