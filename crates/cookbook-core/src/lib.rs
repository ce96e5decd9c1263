//! Core cookbook library (config, identity client, session storage, logging).

pub mod config;
pub mod identity;
pub mod logging;
pub mod session_store;
