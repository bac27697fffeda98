//! Ethereum provider infrastructure

mod provider;

pub use provider::{connect_provider, normalize_http_endpoint, ProviderConfig};
