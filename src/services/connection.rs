//! Connection manager: wallet discovery, account acquisition, network reconciliation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy_primitives::Address;

use crate::core::{ConnectionStatus, SessionContext, WalletSession};
use crate::domain::NetworkParams;

pub const LOGIN_REQUESTED: &str = "Sent request to wallet to login...";
pub const CONNECT_FAILED: &str = "Failed to connect to the wallet. Please try again.";
pub const SWITCH_FAILED: &str = "Failed to switch networks. Press c to try again.";
pub const NO_WALLET: &str =
    "No Ethereum wallet detected! Configure a wallet RPC endpoint to connect.";
pub const ABI_UNAVAILABLE: &str = "Unable to load contract ABI.";

pub fn switch_request_message(chain_id: u64) -> String {
    format!(
        "A request is being sent to your wallet to switch to the correct network (Chain ID: {}).",
        chain_id
    )
}

/// Clears the in-flight flag however the attempt ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Drives the `Disconnected → Connecting → (NetworkMismatch →) Connected` machine
pub struct ConnectionManager {
    context: Arc<SessionContext>,
    network: NetworkParams,
    in_flight: AtomicBool,
}

impl ConnectionManager {
    pub fn new(context: Arc<SessionContext>) -> Self {
        Self {
            context,
            network: NetworkParams::panarchy(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_network(mut self, network: NetworkParams) -> Self {
        self.network = network;
        self
    }

    pub fn network(&self) -> &NetworkParams {
        &self.network
    }

    /// Initial view: warn when there is nothing to connect with, otherwise pick
    /// up accounts the wallet already exposes
    pub async fn startup(&self) {
        let wallet = match self.context.wallet() {
            Ok(wallet) => wallet.clone(),
            Err(_) => {
                tracing::warn!("no wallet configured");
                self.context.update(|session| {
                    session.connect_enabled = false;
                    session.warn(NO_WALLET);
                });
                return;
            }
        };
        if !self.context.has_contract() {
            tracing::warn!("contract ABI unavailable; connect disabled");
            self.context.update(|session| {
                session.connect_enabled = false;
                session.warn(ABI_UNAVAILABLE);
            });
            return;
        }

        match wallet.accounts().await {
            Ok(accounts) if !accounts.is_empty() => self.on_accounts_changed(accounts).await,
            Ok(_) => tracing::debug!("no authorized accounts at startup"),
            Err(err) => tracing::warn!(code = err.code(), %err, "eth_accounts failed"),
        }
    }

    /// Ask the wallet for accounts. Concurrent calls collapse into the one
    /// already in flight.
    pub async fn request_connection(&self) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("connection request already in flight");
            return;
        }
        let _in_flight = InFlight(&self.in_flight);

        let wallet = match self.context.wallet() {
            Ok(wallet) => wallet.clone(),
            Err(_) => {
                self.context.update(|session| session.warn(NO_WALLET));
                return;
            }
        };
        if !self.context.has_contract() {
            self.context.update(|session| session.warn(ABI_UNAVAILABLE));
            return;
        }

        self.context.update(|session| {
            session.connect_enabled = false;
            session.status = ConnectionStatus::Connecting;
            session.notify(LOGIN_REQUESTED);
        });

        match wallet.request_accounts().await {
            Ok(accounts) => self.on_accounts_changed(accounts).await,
            Err(err) => {
                tracing::warn!(code = err.code(), %err, "eth_requestAccounts failed");
                self.context.update(|session| {
                    session.status = ConnectionStatus::Disconnected;
                    session.warn(CONNECT_FAILED);
                });
            }
        }

        self.context.update(|session| session.connect_enabled = true);
    }

    /// Make sure the wallet is on the required chain, asking it to add and
    /// switch once if not. Returns whether the final check matched.
    pub async fn reconcile_network(&self) -> bool {
        let Ok(wallet) = self.context.wallet().cloned() else {
            return false;
        };
        let required = self.network.chain_id;

        match wallet.chain_id().await {
            Ok(chain_id) if chain_id == required => return true,
            Ok(chain_id) => tracing::info!(chain_id, required, "wallet on wrong network"),
            Err(err) => tracing::warn!(code = err.code(), %err, "eth_chainId failed"),
        }

        self.context.update(|session| {
            session.status = ConnectionStatus::NetworkMismatch;
            session.notify(switch_request_message(required));
        });

        if let Err(err) = wallet.add_chain(&self.network.add_chain_params()).await {
            tracing::warn!(code = err.code(), %err, "wallet_addEthereumChain failed");
        }
        if let Err(err) = wallet.switch_chain(&self.network.chain_id_hex()).await {
            tracing::warn!(code = err.code(), %err, "wallet_switchEthereumChain failed");
        }

        match wallet.chain_id().await {
            Ok(chain_id) => {
                tracing::info!(chain_id, required, "network re-checked");
                chain_id == required
            }
            Err(err) => {
                tracing::warn!(code = err.code(), %err, "eth_chainId failed after switch");
                false
            }
        }
    }

    /// `accountsChanged`: start over, then connect with the first account if any
    pub async fn on_accounts_changed(&self, accounts: Vec<Address>) {
        self.context.update(|session| session.reset());

        let Some(account) = accounts.first().copied() else {
            tracing::info!("wallet reports no accounts");
            return;
        };

        self.context.update(|session| {
            session.status = ConnectionStatus::Connecting;
            session.wallet = Some(WalletSession {
                account,
                is_connected: false,
            });
        });

        if self.reconcile_network().await {
            tracing::info!(%account, "connected");
            self.context.update(|session| session.show_connected(account));
        } else {
            self.context.update(|session| {
                session.status = ConnectionStatus::Disconnected;
                session.wallet = None;
                session.warn(SWITCH_FAILED);
            });
        }
    }
}
