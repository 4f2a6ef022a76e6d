//! HTTP surface: router, middleware, and handlers.

pub mod auth;
pub(crate) mod chat;
pub(crate) mod configs;
pub(crate) mod constants;
pub(crate) mod errors;
pub(crate) mod health;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;
