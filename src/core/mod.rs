pub mod context;
pub mod event;
pub mod session;

pub use context::{SessionContext, SessionListener};
pub use event::WalletEvent;
pub use session::{
    ConnectionStatus, Message, MessageLevel, Session, SubmissionResult, WalletSession,
};
