//! In-memory wallet and contract collaborators shared by the flow tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, U256};

use panarchy_console::core::{Session, SessionContext};
use panarchy_console::domain::network::parse_chain_id_hex;
use panarchy_console::domain::AddChainParams;
use panarchy_console::error::{ContractCallError, ProviderError};
use panarchy_console::infrastructure::contract::{ContractClient, TxOptions, CONTRACT_ADDRESS};
use panarchy_console::infrastructure::wallet::WalletProvider;

/// Every wallet and contract request, in the order it happened
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn count(log: &CallLog, entry: &str) -> usize {
    log.lock().unwrap().iter().filter(|e| e.as_str() == entry).count()
}

pub fn account() -> Address {
    Address::repeat_byte(0xaa)
}

pub struct MockWallet {
    log: CallLog,
    pub chain_id: Mutex<u64>,
    pub accounts: Vec<Address>,
    pub authorized: AtomicBool,
    pub reject_request: bool,
    pub add_fails: bool,
    pub switch_succeeds: bool,
    pub fail_chain_id: AtomicBool,
    pub gas_price: u128,
}

impl MockWallet {
    pub fn on_chain(chain_id: u64, log: CallLog) -> Self {
        Self {
            log,
            chain_id: Mutex::new(chain_id),
            accounts: vec![account()],
            authorized: AtomicBool::new(false),
            reject_request: false,
            add_fails: false,
            switch_succeeds: true,
            fail_chain_id: AtomicBool::new(false),
            gas_price: 7_000_000_000,
        }
    }

    pub fn authorized(self) -> Self {
        self.authorized.store(true, Ordering::SeqCst);
        self
    }

    fn record(&self, entry: impl Into<String>) {
        self.log.lock().unwrap().push(entry.into());
    }
}

#[async_trait::async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("eth_requestAccounts");
        // Give concurrent callers a chance to interleave
        tokio::task::yield_now().await;
        if self.reject_request {
            return Err(ProviderError::Rejected);
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(self.accounts.clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("eth_accounts");
        if self.authorized.load(Ordering::SeqCst) {
            Ok(self.accounts.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.record("eth_chainId");
        if self.fail_chain_id.load(Ordering::SeqCst) {
            return Err(ProviderError::Rpc("node unreachable".into()));
        }
        Ok(*self.chain_id.lock().unwrap())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        self.record(format!("wallet_addEthereumChain:{}", params.chain_id));
        if self.add_fails {
            return Err(ProviderError::Rejected);
        }
        Ok(())
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError> {
        self.record(format!("wallet_switchEthereumChain:{}", chain_id_hex));
        if !self.switch_succeeds {
            return Err(ProviderError::Rejected);
        }
        let chain_id = parse_chain_id_hex(chain_id_hex)
            .ok_or_else(|| ProviderError::InvalidParams(chain_id_hex.into()))?;
        *self.chain_id.lock().unwrap() = chain_id;
        Ok(())
    }

    async fn gas_price(&self) -> Result<u128, ProviderError> {
        self.record("eth_gasPrice");
        Ok(self.gas_price)
    }
}

pub struct MockContract {
    log: CallLog,
    /// `None` makes the schedule read fail
    pub schedule: Option<u64>,
    pub responses: HashMap<String, Result<Vec<DynSolValue>, ContractCallError>>,
    pub send_error: Option<ContractCallError>,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
    pub sends: Mutex<Vec<(String, Vec<String>, TxOptions)>>,
}

impl MockContract {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            schedule: Some(0),
            responses: HashMap::new(),
            send_error: None,
            calls: Mutex::new(Vec::new()),
            sends: Mutex::new(Vec::new()),
        }
    }

    pub fn with_schedule(mut self, schedule: Option<u64>) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn respond(
        mut self,
        method: &str,
        response: Result<Vec<DynSolValue>, ContractCallError>,
    ) -> Self {
        self.responses.insert(method.to_string(), response);
        self
    }

    pub fn recorded_calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn recorded_sends(&self) -> Vec<(String, Vec<String>, TxOptions)> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ContractClient for MockContract {
    fn address(&self) -> Address {
        CONTRACT_ADDRESS
    }

    async fn call(
        &self,
        method: &str,
        args: &[String],
    ) -> Result<Vec<DynSolValue>, ContractCallError> {
        self.log.lock().unwrap().push(format!("call:{}", method));
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), args.to_vec()));
        if method == "schedule" {
            return match self.schedule {
                Some(t) => Ok(vec![DynSolValue::Uint(U256::from(t), 256)]),
                None => Err(ContractCallError::Rpc("execution reverted".into())),
            };
        }
        self.responses
            .get(method)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn send(
        &self,
        method: &str,
        args: &[String],
        options: TxOptions,
    ) -> Result<B256, ContractCallError> {
        self.log.lock().unwrap().push(format!("send:{}", method));
        self.sends
            .lock()
            .unwrap()
            .push((method.to_string(), args.to_vec(), options));
        match &self.send_error {
            Some(err) => Err(err.clone()),
            None => Ok(B256::repeat_byte(0x11)),
        }
    }
}

/// Context plus a record of every published snapshot
pub fn context_with(
    wallet: Option<Arc<MockWallet>>,
    contract: Option<Arc<MockContract>>,
) -> (Arc<SessionContext>, Arc<Mutex<Vec<Session>>>) {
    let published = Arc::new(Mutex::new(Vec::new()));
    let sink = published.clone();
    let context = SessionContext::new(
        wallet.map(|wallet| wallet as Arc<dyn WalletProvider>),
        contract.map(|contract| contract as Arc<dyn ContractClient>),
    )
    .with_listener(move |session| sink.lock().unwrap().push(session.clone()));
    (Arc::new(context), published)
}
