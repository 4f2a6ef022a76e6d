#![forbid(unsafe_code)]

//! Binary entrypoint that wires the modelgate services together.

use modelgate_app::{AppResult, run_app};

/// Bootstraps the modelgate application and blocks until shutdown.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
