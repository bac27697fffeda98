//! The two handlers behind every user action: connecting and dispatching

pub mod connection;
pub mod dispatcher;

pub use connection::ConnectionManager;
pub use dispatcher::Dispatcher;
