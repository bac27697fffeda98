//! Error kinds surfaced to the user

use thiserror::Error;

/// A wallet RPC failed, was rejected, or no wallet is available
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("no wallet available")]
    NoWallet,
    #[error("user rejected the request")]
    Rejected,
    #[error("unrecognized chain ID {0}")]
    UnrecognizedChain(String),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("wallet RPC error: {0}")]
    Rpc(String),
}

impl ProviderError {
    /// EIP-1193 / EIP-3326 style error code
    pub fn code(&self) -> i64 {
        match self {
            ProviderError::NoWallet => 4900,
            ProviderError::Rejected => 4001,
            ProviderError::UnrecognizedChain(_) => 4902,
            ProviderError::InvalidParams(_) => -32602,
            ProviderError::Rpc(_) => -32603,
        }
    }
}

/// A contract call or transaction failed before, during, or after submission
#[derive(Debug, Clone, Error)]
pub enum ContractCallError {
    #[error("contract not loaded")]
    NotLoaded,
    #[error("missing field '{0}'")]
    MissingField(String),
    #[error("could not read the current schedule")]
    ScheduleUnavailable,
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
    #[error("no overload of '{method}' takes {arity} arguments")]
    UnknownMethod { method: String, arity: usize },
    #[error("invalid argument {index} ({kind}): {reason}")]
    InvalidArgument {
        index: usize,
        kind: String,
        reason: String,
    },
    #[error("no sender account")]
    NoSender,
    #[error("{0}")]
    Abi(String),
    #[error("{0}")]
    Rpc(String),
    #[error("transaction {0} reverted")]
    Reverted(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
