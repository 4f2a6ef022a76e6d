#![forbid(unsafe_code)]

//! Modelgate application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (environment loading and service wiring),
//! `error.rs` (application-level errors).

pub mod bootstrap;
pub mod error;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
