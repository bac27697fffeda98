//! UI-visible session state

use alloy_primitives::Address;

use crate::domain::Field;

/// Connection state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    NetworkMismatch,
    Connected,
}

impl ConnectionStatus {
    pub fn title(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connecting => "Connecting",
            ConnectionStatus::NetworkMismatch => "Wrong network",
            ConnectionStatus::Connected => "Connected",
        }
    }
}

/// The account the wallet handed us
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    pub account: Address,
    pub is_connected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

/// Outcome of one submission, shown in the result panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Success(String),
    Failure(String),
}

impl SubmissionResult {
    pub fn text(&self) -> &str {
        match self {
            SubmissionResult::Success(text) | SubmissionResult::Failure(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success(_))
    }
}

/// Everything the screen shows, owned by one session context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub status: ConnectionStatus,
    pub wallet: Option<WalletSession>,
    pub message: Option<Message>,
    /// Whether the connect control accepts presses
    pub connect_enabled: bool,
    pub selected_operation: Option<String>,
    pub fields: Vec<Field>,
    pub submit_visible: bool,
    pub result: Option<SubmissionResult>,
    /// Bumped whenever the form is rebuilt or cleared
    pub form_revision: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            wallet: None,
            message: None,
            connect_enabled: true,
            selected_operation: None,
            fields: Vec::new(),
            submit_visible: false,
            result: None,
            form_revision: 0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the disconnected view: no account, no message, no selection, empty form
    pub fn reset(&mut self) {
        self.status = ConnectionStatus::Disconnected;
        self.wallet = None;
        self.message = None;
        self.selected_operation = None;
        self.clear_form();
    }

    /// Drop rendered fields, hide the submit control and the result panel
    pub fn clear_form(&mut self) {
        self.fields.clear();
        self.submit_visible = false;
        self.result = None;
        self.form_revision = self.form_revision.wrapping_add(1);
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            level: MessageLevel::Info,
            text: text.into(),
        });
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            level: MessageLevel::Warning,
            text: text.into(),
        });
    }

    pub fn show_connected(&mut self, account: Address) {
        self.status = ConnectionStatus::Connected;
        self.wallet = Some(WalletSession {
            account,
            is_connected: true,
        });
        self.message = None;
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn account(&self) -> Option<Address> {
        self.wallet
            .as_ref()
            .filter(|wallet| wallet.is_connected)
            .map(|wallet| wallet.account)
    }

    pub fn result_visible(&self) -> bool {
        self.result.is_some()
    }
}
