//! Wallet provider abstraction
//!
//! The console never talks to a node directly for account or network
//! questions; it goes through a [`WalletProvider`], the same request surface
//! an injected browser wallet exposes.

mod local;

use alloy_primitives::Address;

use crate::domain::AddChainParams;
use crate::error::ProviderError;

pub use local::{LocalWallet, WalletConfig, DEFAULT_PRIVATE_KEY_ENV};

/// Request surface of a Web3 wallet
#[async_trait::async_trait]
pub trait WalletProvider: Send + Sync + 'static {
    /// `eth_requestAccounts`: ask the user to authorize, then return accounts
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// `eth_accounts`: accounts already authorized, empty otherwise
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// `eth_chainId`
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// `wallet_addEthereumChain`
    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError>;

    /// `wallet_switchEthereumChain` with a `0x`-prefixed hex chain id
    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError>;

    /// `eth_gasPrice` in wei
    async fn gas_price(&self) -> Result<u128, ProviderError>;
}
