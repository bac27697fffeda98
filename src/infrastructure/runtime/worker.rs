//! Async worker - owns the session context and runs every wallet/contract handler

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;

use crate::core::{SessionContext, WalletEvent};
use crate::domain::NetworkParams;
use crate::infrastructure::abi::load_abi;
use crate::infrastructure::contract::{AlloyContract, ContractClient};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};
use crate::infrastructure::wallet::{LocalWallet, WalletConfig, WalletProvider};
use crate::services::{ConnectionManager, Dispatcher};

/// What the worker needs to build its collaborators
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// `None` when no wallet endpoint is configured
    pub wallet: Option<WalletConfig>,
    /// ABI file path or http(s) URL
    pub abi_source: String,
    pub network: NetworkParams,
}

/// Run the async worker loop
pub async fn run_async_worker(
    settings: WorkerSettings,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let wallet = match settings.wallet {
        Some(config) => match LocalWallet::connect(config).await {
            Ok(wallet) => Some(Arc::new(wallet)),
            Err(err) => {
                tracing::error!("wallet unavailable: {:#}", err);
                let _ = evt_tx.send(RuntimeEvent::Error {
                    message: format!("Wallet unavailable: {:#}", err),
                });
                None
            }
        },
        None => None,
    };

    let contract: Option<Arc<dyn ContractClient>> = match &wallet {
        Some(wallet) => match load_abi(&settings.abi_source).await {
            Ok(abi) => {
                let functions = abi.functions().count();
                let contract = AlloyContract::new(abi, wallet.clone());
                tracing::info!(
                    source = %settings.abi_source,
                    address = %contract.address(),
                    functions,
                    "contract ABI loaded"
                );
                Some(Arc::new(contract) as Arc<dyn ContractClient>)
            }
            Err(err) => {
                tracing::error!("{:#}", err);
                None
            }
        },
        None => None,
    };

    let mut wallet_events: Option<broadcast::Receiver<WalletEvent>> =
        wallet.as_ref().map(|wallet| wallet.subscribe());

    let listener_tx = evt_tx.clone();
    let context = Arc::new(
        SessionContext::new(
            wallet
                .clone()
                .map(|wallet| wallet as Arc<dyn WalletProvider>),
            contract,
        )
        .with_listener(move |session| {
            let _ = listener_tx.send(RuntimeEvent::SessionUpdated(session.clone()));
        }),
    );

    let manager = ConnectionManager::new(context.clone()).with_network(settings.network);
    let dispatcher = Dispatcher::new(context.clone());

    let _ = evt_tx.send(RuntimeEvent::SessionUpdated(context.snapshot()));
    manager.startup().await;

    loop {
        // Commands run one at a time, each to completion
        loop {
            let cmd = match cmd_rx.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            };
            match cmd {
                RuntimeCommand::Shutdown => return Ok(()),
                RuntimeCommand::Connect => manager.request_connection().await,
                RuntimeCommand::SelectOperation { name } => {
                    dispatcher.select_operation(&name).await
                }
                RuntimeCommand::Submit { name, values } => {
                    dispatcher.submit(&name, &values).await;
                }
                RuntimeCommand::CycleAccount => {
                    if let Some(wallet) = &wallet {
                        if let Err(err) = wallet.select_next_account().await {
                            tracing::warn!(%err, "account selection failed");
                        }
                    }
                }
                RuntimeCommand::Disconnect => {
                    if let Some(wallet) = &wallet {
                        wallet.disconnect();
                    }
                }
            }
        }

        if let Some(events) = wallet_events.as_mut() {
            loop {
                match events.try_recv() {
                    Ok(WalletEvent::AccountsChanged(accounts)) => {
                        manager.on_accounts_changed(accounts).await
                    }
                    Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "wallet events lagged");
                    }
                    Err(_) => break,
                }
            }
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
