//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based provider construction and the local wallet
//! - The contract collaborator, encoding through alloy-dyn-abi
//! - ABI loading and value conversion
//! - Tokio runtime bridge for async operations

pub mod abi;
pub mod contract;
pub mod ethereum;
pub mod runtime;
pub mod wallet;
