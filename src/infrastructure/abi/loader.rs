//! Contract ABI loading from a local file or an http(s) URL

use std::path::Path;
use std::time::Duration;

use alloy_json_abi::JsonAbi;
use anyhow::{Context, Result};

/// Load the ABI from `source`, which is either a path or an http(s) URL
pub async fn load_abi(source: &str) -> Result<JsonAbi> {
    let content = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_remote(source).await?
    } else {
        tokio::fs::read_to_string(Path::new(source))
            .await
            .with_context(|| format!("Failed to read ABI file {}", source))?
    };
    parse_abi(&content).with_context(|| format!("Failed to parse ABI from {}", source))
}

async fn fetch_remote(url: &str) -> Result<String> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to create HTTP client")?;
    let response = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch ABI from {}", url))?
        .error_for_status()?;
    Ok(response.text().await?)
}

/// Accept either a raw ABI array or an artifact with a nested `abi` field
pub fn parse_abi(content: &str) -> Result<JsonAbi> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let abi_value = if value.is_array() {
        value
    } else if let Some(abi) = value.get("abi") {
        abi.clone()
    } else {
        anyhow::bail!("no ABI array found");
    };
    Ok(serde_json::from_value(abi_value)?)
}
