//! ABI infrastructure - loading the contract ABI and converting values with alloy-dyn-abi

mod codec;
mod loader;

pub use codec::{format_output, format_scalar, parse_value, to_json};
pub use loader::{load_abi, parse_abi};
