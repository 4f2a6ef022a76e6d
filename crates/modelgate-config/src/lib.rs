#![forbid(unsafe_code)]

//! Database-backed configuration versioning built on `PostgreSQL`.
//!
//! Layout: `model.rs` (typed configuration models), `validate.rs`
//! (field validation), `defaults.rs` (fallback constants), `service.rs`
//! (`ConfigService` + the `ConfigStore` trait consumed by the API layer).

pub mod defaults;
pub mod error;
pub mod model;
pub mod service;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{ConfigVersion, EffectiveConfig, NewConfigVersion, PublishOutcome};
pub use service::{ConfigService, ConfigStore};
