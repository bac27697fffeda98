use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{NativeCurrency, NetworkParams};
use crate::infrastructure::wallet::DEFAULT_PRIVATE_KEY_ENV;

/// A network the wallet knows before anyone asks it to add one
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkEntry {
    pub chain_id: u64,
    pub name: Option<String>,
    pub rpc: String,
}

impl NetworkEntry {
    pub fn to_params(&self) -> NetworkParams {
        NetworkParams {
            chain_id: self.chain_id,
            chain_name: self
                .name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| format!("Chain {}", self.chain_id)),
            rpc_url: self.rpc.clone(),
            native_currency: NativeCurrency {
                name: "ETH".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            block_explorer_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP JSON-RPC endpoint the wallet starts on
    pub rpc: Option<String>,

    /// WebSocket endpoint the wallet starts on; wins over `rpc`
    pub ws: Option<String>,

    /// ABI file path or URL
    pub abi: Option<String>,

    pub log_file: Option<PathBuf>,

    /// Expose accounts at startup without a connect request
    #[serde(default)]
    pub preauthorized: bool,

    /// Environment variable holding the private keys
    pub private_key_env: Option<String>,

    #[serde(default)]
    pub networks: Vec<NetworkEntry>,
}

impl Config {
    pub fn private_key_env(&self) -> &str {
        self.private_key_env
            .as_deref()
            .filter(|var| !var.trim().is_empty())
            .unwrap_or(DEFAULT_PRIVATE_KEY_ENV)
    }

    pub fn network_params(&self) -> Vec<NetworkParams> {
        self.networks.iter().map(NetworkEntry::to_params).collect()
    }
}

pub const DEFAULT_ABI: &str = "abi.json";

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content)
}

/// Parse config text; anything malformed falls back to defaults
pub fn parse(content: &str) -> Config {
    toml::from_str::<Config>(content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PANARCHY_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("panarchy").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("panarchy").join("config.toml"));
    }

    directories::ProjectDirs::from("org", "polytopia", "panarchy")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("panarchy"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("panarchy"));
    }
    directories::ProjectDirs::from("org", "polytopia", "panarchy")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn default_log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("panarchy.log"))
}
