//! Endpoint configuration and Alloy provider construction

use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use anyhow::{Context, Result};

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
}

impl ProviderConfig {
    /// Pick the transport from the URL scheme; bare hosts are treated as HTTP
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim();
        if trimmed.starts_with("ws://") || trimmed.starts_with("wss://") {
            ProviderConfig::WebSocket(trimmed.to_string())
        } else {
            ProviderConfig::Http(normalize_http_endpoint(trimmed))
        }
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
        }
    }
}

/// Prefix `http://` when no scheme is given
pub fn normalize_http_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Connect to an endpoint, attaching local signers when there are any.
///
/// Without signers, transactions go out as `eth_sendTransaction` and the node
/// signs with its unlocked accounts.
pub async fn connect_provider(
    config: &ProviderConfig,
    signer: Option<EthereumWallet>,
) -> Result<DynProvider> {
    match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            let provider = match signer {
                Some(wallet) => ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_http(rpc_url)
                    .erased(),
                None => ProviderBuilder::new().connect_http(rpc_url).erased(),
            };
            Ok(provider)
        }
        ProviderConfig::WebSocket(url) => {
            let provider = match signer {
                Some(wallet) => ProviderBuilder::new()
                    .wallet(wallet)
                    .connect(url)
                    .await
                    .context("Failed to create WebSocket provider")?
                    .erased(),
                None => ProviderBuilder::new()
                    .connect(url)
                    .await
                    .context("Failed to create WebSocket provider")?
                    .erased(),
            };
            Ok(provider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        assert_eq!(
            ProviderConfig::from_url("localhost:8545"),
            ProviderConfig::Http("http://localhost:8545".into())
        );
        assert_eq!(
            ProviderConfig::from_url("https://polytopia.org:8545"),
            ProviderConfig::Http("https://polytopia.org:8545".into())
        );
        assert_eq!(
            ProviderConfig::from_url(" ws://127.0.0.1:8546 "),
            ProviderConfig::WebSocket("ws://127.0.0.1:8546".into())
        );
    }
}
