#![forbid(unsafe_code)]

//! Data access layer for the modelgate configuration store.
//!
//! Layout: `config.rs` (migrations, row projections, query functions),
//! `error.rs` (`DataError`).

pub mod config;
pub mod error;

pub use config::{
    ConfigVersionRow, NewConfigRow, activate_config, fetch_active_configs, fetch_config_by_id,
    insert_config, list_configs, run_migrations,
};
pub use error::{DataError, Result};
