//! Session context shared by the connection manager and the dispatcher

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::session::Session;
use crate::error::{ContractCallError, ProviderError};
use crate::infrastructure::contract::ContractClient;
use crate::infrastructure::wallet::WalletProvider;

/// Called with the new state after every update
pub type SessionListener = Box<dyn Fn(&Session) + Send + Sync>;

/// The single process-wide context handed to every handler.
///
/// Holds the visible [`Session`] together with the collaborators it was built
/// from. A missing wallet or contract is a startup condition, not an error.
pub struct SessionContext {
    state: Mutex<Session>,
    wallet: Option<Arc<dyn WalletProvider>>,
    contract: Option<Arc<dyn ContractClient>>,
    listener: Option<SessionListener>,
}

impl SessionContext {
    pub fn new(
        wallet: Option<Arc<dyn WalletProvider>>,
        contract: Option<Arc<dyn ContractClient>>,
    ) -> Self {
        Self {
            state: Mutex::new(Session::new()),
            wallet,
            contract,
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: impl Fn(&Session) + Send + Sync + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the session and publish the result. The lock is never held across an await.
    pub fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.lock();
        let out = f(&mut session);
        if let Some(listener) = &self.listener {
            listener(&session);
        }
        out
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn has_contract(&self) -> bool {
        self.contract.is_some()
    }

    pub fn wallet(&self) -> Result<&Arc<dyn WalletProvider>, ProviderError> {
        self.wallet.as_ref().ok_or(ProviderError::NoWallet)
    }

    pub fn contract(&self) -> Result<&Arc<dyn ContractClient>, ContractCallError> {
        self.contract.as_ref().ok_or(ContractCallError::NotLoaded)
    }
}
