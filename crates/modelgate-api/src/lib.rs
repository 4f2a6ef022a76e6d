#![forbid(unsafe_code)]

//! HTTP boundary for the modelgate administrative surface.
//!
//! Layout: `config.rs` (shared trait-object handles), `state.rs`
//! (application state), `models.rs` (wire DTOs and the model catalog),
//! `http/` (router, errors, auth middleware, handlers).

pub mod config;
pub mod http;
pub mod models;
pub mod state;

pub use config::{SharedCompletion, SharedConfig};
pub use http::auth::AdminAuth;
pub use http::router::{ApiServer, ApiServerError};
