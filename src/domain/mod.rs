//! Pure data layer: network constants, the operation table, and the form model
//!
//! Nothing in here touches the terminal or the network.

pub mod form;
pub mod network;
pub mod operations;
pub mod preimage;

pub use form::{Field, FieldKind, FormValues, SelectOption};
pub use network::{AddChainParams, NativeCurrency, NetworkParams, CHAIN_ID};
pub use operations::{InvocationKind, OperationDescriptor, OPERATIONS};
