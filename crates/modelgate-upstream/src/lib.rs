#![forbid(unsafe_code)]

//! Client for the upstream chat-completion API.
//!
//! Layout: `client.rs` (`CompletionBackend` trait, `OpenRouterClient`, wire
//! types), `error.rs` (`UpstreamError`).

pub mod client;
pub mod error;

pub use client::{
    CompletionBackend, CompletionRequest, DEFAULT_COMPLETIONS_URL, OpenRouterClient, compose_prompt,
};
pub use error::UpstreamError;
