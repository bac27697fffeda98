//! Inbound wallet notifications

use alloy_primitives::Address;

/// Something the wallet changed on its own side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The exposed account list changed; empty means disconnected
    AccountsChanged(Vec<Address>),
}
