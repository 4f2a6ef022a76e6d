//! Shared handles to the backends the API layer depends on.

use std::sync::Arc;

use modelgate_config::ConfigStore;
use modelgate_upstream::CompletionBackend;

/// Shared reference to the configuration backend.
pub type SharedConfig = Arc<dyn ConfigStore>;

/// Shared reference to the completion backend.
pub type SharedCompletion = Arc<dyn CompletionBackend>;
