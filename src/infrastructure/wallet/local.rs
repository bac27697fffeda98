//! Local wallet: private keys from the environment, alloy providers per network

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider};
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;
use anyhow::{Context, Result};
use tokio::sync::broadcast;

use crate::core::WalletEvent;
use crate::domain::network::parse_chain_id_hex;
use crate::domain::{AddChainParams, NetworkParams};
use crate::error::ProviderError;
use crate::infrastructure::ethereum::{connect_provider, ProviderConfig};
use crate::infrastructure::wallet::WalletProvider;

/// Environment variable holding comma-separated private keys
pub const DEFAULT_PRIVATE_KEY_ENV: &str = "PANARCHY_PRIVATE_KEYS";

/// How to build a [`LocalWallet`]
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Endpoint of the network the wallet starts on
    pub endpoint: ProviderConfig,
    /// Networks known before any `wallet_addEthereumChain`
    pub networks: Vec<NetworkParams>,
    /// Hex private keys; empty means the node's unlocked accounts are used
    pub private_keys: Vec<String>,
    /// Expose accounts without an explicit `eth_requestAccounts`
    pub preauthorized: bool,
}

impl WalletConfig {
    pub fn new(endpoint: ProviderConfig) -> Self {
        Self {
            endpoint,
            networks: Vec::new(),
            private_keys: Vec::new(),
            preauthorized: false,
        }
    }

    /// Read comma-separated keys from `var`; unset or blank means none
    pub fn keys_from_env(var: &str) -> Vec<String> {
        std::env::var(var)
            .map(|raw| split_keys(&raw))
            .unwrap_or_default()
    }
}

fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

struct ActiveNetwork {
    endpoint: ProviderConfig,
    provider: DynProvider,
}

/// A wallet that signs locally and reaches the chain through alloy providers.
///
/// Behaves like an injected browser wallet: accounts stay hidden until
/// authorized, networks must be registered before they can be switched to,
/// and account changes are broadcast as [`WalletEvent`]s.
pub struct LocalWallet {
    signer: Option<EthereumWallet>,
    signer_addresses: Vec<Address>,
    networks: Mutex<BTreeMap<u64, ProviderConfig>>,
    active: RwLock<ActiveNetwork>,
    authorized: AtomicBool,
    selected: AtomicUsize,
    events: broadcast::Sender<WalletEvent>,
}

impl LocalWallet {
    /// Build the wallet and open its initial provider
    pub async fn connect(config: WalletConfig) -> Result<Self> {
        let signers = config
            .private_keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                key.parse::<PrivateKeySigner>()
                    .with_context(|| format!("Invalid private key #{}", index + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        let signer_addresses: Vec<Address> = signers.iter().map(|s| s.address()).collect();
        let signer = signers.into_iter().fold(None, |wallet, signer| match wallet {
            None => Some(EthereumWallet::new(signer)),
            Some(mut wallet) => {
                wallet.register_signer(signer);
                Some(wallet)
            }
        });

        let provider = connect_provider(&config.endpoint, signer.clone())
            .await
            .with_context(|| format!("Failed to connect to {}", config.endpoint.display()))?;

        let networks = config
            .networks
            .iter()
            .map(|network| {
                (
                    network.chain_id,
                    ProviderConfig::from_url(&network.rpc_url),
                )
            })
            .collect();

        let (events, _) = broadcast::channel(16);

        tracing::info!(
            endpoint = %config.endpoint.display(),
            signers = signer_addresses.len(),
            "wallet ready"
        );

        Ok(Self {
            signer,
            signer_addresses,
            networks: Mutex::new(networks),
            active: RwLock::new(ActiveNetwork {
                endpoint: config.endpoint,
                provider,
            }),
            authorized: AtomicBool::new(config.preauthorized),
            selected: AtomicUsize::new(0),
            events,
        })
    }

    /// Provider of the currently active network
    pub fn provider(&self) -> DynProvider {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .provider
            .clone()
    }

    pub fn endpoint(&self) -> ProviderConfig {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .endpoint
            .clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    /// Chain ids that can be switched to
    pub fn known_chains(&self) -> Vec<u64> {
        self.networks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    /// Make the next account the primary one and announce the change
    pub async fn select_next_account(&self) -> Result<(), ProviderError> {
        if !self.is_authorized() {
            return Ok(());
        }
        self.selected.fetch_add(1, Ordering::SeqCst);
        let accounts = self.available_accounts().await?;
        tracing::debug!(primary = ?accounts.first(), "account selected");
        self.emit(WalletEvent::AccountsChanged(accounts));
        Ok(())
    }

    /// Revoke authorization; listeners see an empty account list
    pub fn disconnect(&self) {
        self.authorized.store(false, Ordering::SeqCst);
        tracing::info!("wallet disconnected");
        self.emit(WalletEvent::AccountsChanged(Vec::new()));
    }

    fn emit(&self, event: WalletEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    /// Every account this wallet controls, primary first
    async fn available_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let mut accounts = if self.signer_addresses.is_empty() {
            self.provider()
                .get_accounts()
                .await
                .map_err(|e| ProviderError::Rpc(e.to_string()))?
        } else {
            self.signer_addresses.clone()
        };
        if !accounts.is_empty() {
            let shift = self.selected.load(Ordering::SeqCst) % accounts.len();
            accounts.rotate_left(shift);
        }
        Ok(accounts)
    }
}

#[async_trait::async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let accounts = self.available_accounts().await?;
        if accounts.is_empty() {
            return Err(ProviderError::Rejected);
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(accounts)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        if !self.is_authorized() {
            return Ok(Vec::new());
        }
        self.available_accounts().await
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let (endpoint, provider) = {
            let active = self.active.read().unwrap_or_else(PoisonError::into_inner);
            (active.endpoint.clone(), active.provider.clone())
        };
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))?;
        // The starting endpoint becomes switchable once its id is known
        self.networks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(chain_id)
            .or_insert(endpoint);
        Ok(chain_id)
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        let chain_id = parse_chain_id_hex(&params.chain_id).ok_or_else(|| {
            ProviderError::InvalidParams(format!("bad chainId '{}'", params.chain_id))
        })?;
        let rpc_url = params
            .rpc_urls
            .first()
            .ok_or_else(|| ProviderError::InvalidParams("rpcUrls is empty".to_string()))?;
        let endpoint = ProviderConfig::from_url(rpc_url);
        tracing::info!(
            chain_id,
            name = %params.chain_name,
            endpoint = %endpoint.display(),
            "network added"
        );
        self.networks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chain_id, endpoint);
        Ok(())
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError> {
        let chain_id = parse_chain_id_hex(chain_id_hex).ok_or_else(|| {
            ProviderError::InvalidParams(format!("bad chainId '{}'", chain_id_hex))
        })?;
        let endpoint = self
            .networks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chain_id)
            .cloned()
            .ok_or_else(|| ProviderError::UnrecognizedChain(chain_id_hex.to_string()))?;

        let provider = connect_provider(&endpoint, self.signer.clone())
            .await
            .map_err(|e| ProviderError::Rpc(format!("{:#}", e)))?;

        tracing::info!(chain_id, endpoint = %endpoint.display(), "switched network");
        *self.active.write().unwrap_or_else(PoisonError::into_inner) =
            ActiveNetwork { endpoint, provider };
        Ok(())
    }

    async fn gas_price(&self) -> Result<u128, ProviderError> {
        self.provider()
            .get_gas_price()
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))
    }
}
