//! Panarchy console: connect a wallet, make sure it sits on the Panarchy
//! network, and call the Panarchy contract through generated forms.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod services;
pub mod ui;
