//! Required network parameters and chain id helpers

use serde::{Deserialize, Serialize};

/// Chain id of the Panarchy network
pub const CHAIN_ID: u64 = 2013;

/// Native currency display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters of a network the wallet can be asked to register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_url: String,
    pub native_currency: NativeCurrency,
    pub block_explorer_url: Option<String>,
}

impl NetworkParams {
    /// The network the console insists on
    pub fn panarchy() -> Self {
        Self {
            chain_id: CHAIN_ID,
            chain_name: "Panarchy".to_string(),
            rpc_url: "https://polytopia.org:8545".to_string(),
            native_currency: NativeCurrency {
                name: "GAS".to_string(),
                symbol: "GAS".to_string(),
                decimals: 18,
            },
            block_explorer_url: Some("https://scan.polytopia.org".to_string()),
        }
    }

    /// Hex chain id as sent to `wallet_switchEthereumChain`
    pub fn chain_id_hex(&self) -> String {
        chain_id_hex(self.chain_id)
    }

    /// Build the `wallet_addEthereumChain` payload
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: self.chain_name.clone(),
            rpc_urls: vec![self.rpc_url.clone()],
            native_currency: self.native_currency.clone(),
            block_explorer_urls: self.block_explorer_url.iter().cloned().collect(),
        }
    }
}

/// Payload of `wallet_addEthereumChain` (EIP-3085 field names)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub block_explorer_urls: Vec<String>,
}

/// Format a chain id as `0x` followed by uppercase hex digits, no leading zeros
pub fn chain_id_hex(chain_id: u64) -> String {
    format!("0x{:X}", chain_id)
}

/// Parse a hex chain id in either case, with or without the `0x` prefix
pub fn parse_chain_id_hex(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
