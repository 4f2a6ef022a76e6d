//! Stub backends shared by the handler and router tests.

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use modelgate_config::{
    ConfigError, ConfigStore, ConfigVersion, EffectiveConfig, NewConfigVersion, PublishOutcome,
};
use modelgate_upstream::{CompletionBackend, CompletionRequest, UpstreamError};

pub(crate) fn sample_version(
    id: i64,
    version: i64,
    model: &str,
    is_active: bool,
) -> ConfigVersion {
    ConfigVersion {
        id,
        version,
        model: model.to_string(),
        temperature: 0.9,
        max_tokens: 1500,
        system_prompt: String::new(),
        is_active,
        created_at: Utc::now(),
    }
}

/// Scriptable `ConfigStore` double.
#[derive(Default)]
pub(crate) struct StubStore {
    active: Option<ConfigVersion>,
    versions: Vec<ConfigVersion>,
    created: Option<ConfigVersion>,
    create_error: Mutex<Option<ConfigError>>,
    publish_target: Option<ConfigVersion>,
    fail_resolve: bool,
    recorded_limits: Arc<Mutex<Vec<Option<i64>>>>,
}

impl StubStore {
    pub(crate) fn with_active(version: ConfigVersion) -> Self {
        Self {
            active: Some(version),
            ..Self::default()
        }
    }

    pub(crate) fn creating(version: ConfigVersion) -> Self {
        Self {
            created: Some(version),
            ..Self::default()
        }
    }

    pub(crate) fn failing_create(error: ConfigError) -> Self {
        Self {
            create_error: Mutex::new(Some(error)),
            ..Self::default()
        }
    }

    pub(crate) fn publishing(version: ConfigVersion) -> Self {
        Self {
            publish_target: Some(version),
            ..Self::default()
        }
    }

    /// A store whose `resolve_effective` fails loudly; used to prove a code
    /// path never consults the store.
    pub(crate) fn refusing_resolution() -> Self {
        Self {
            fail_resolve: true,
            ..Self::default()
        }
    }

    pub(crate) fn recorded_limits(&self) -> Arc<Mutex<Vec<Option<i64>>>> {
        Arc::clone(&self.recorded_limits)
    }
}

#[async_trait]
impl ConfigStore for StubStore {
    async fn create_version(&self, _input: NewConfigVersion) -> Result<ConfigVersion> {
        if let Some(error) = self.create_error.lock().expect("lock").take() {
            return Err(error.into());
        }
        self.created
            .clone()
            .ok_or_else(|| anyhow!("create_version not scripted"))
    }

    async fn publish_version(&self, id: i64) -> Result<PublishOutcome> {
        match &self.publish_target {
            Some(version) if version.id == id => Ok(PublishOutcome {
                status: "ok".to_string(),
                active_id: version.id,
                active_version: version.version,
            }),
            _ => Err(ConfigError::VersionNotFound { id }.into()),
        }
    }

    async fn active_version(&self) -> Result<Option<ConfigVersion>> {
        Ok(self.active.clone())
    }

    async fn list_versions(&self, limit: Option<i64>) -> Result<Vec<ConfigVersion>> {
        self.recorded_limits.lock().expect("lock").push(limit);
        Ok(self.versions.clone())
    }

    async fn resolve_effective(&self) -> Result<EffectiveConfig> {
        if self.fail_resolve {
            return Err(anyhow!("resolve_effective must not be called here"));
        }
        Ok(self
            .active
            .clone()
            .map_or_else(EffectiveConfig::fallback, EffectiveConfig::from))
    }
}

/// Recording `CompletionBackend` double.
pub(crate) struct StubBackend {
    reply: String,
    error: Mutex<Option<UpstreamError>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl StubBackend {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            error: Mutex::new(None),
            requests: Arc::default(),
        }
    }

    pub(crate) fn failing(error: UpstreamError) -> Self {
        Self {
            reply: String::new(),
            error: Mutex::new(Some(error)),
            requests: Arc::default(),
        }
    }

    pub(crate) fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl CompletionBackend for StubBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, UpstreamError> {
        self.requests.lock().expect("lock").push(request);
        if let Some(error) = self.error.lock().expect("lock").take() {
            return Err(error);
        }
        Ok(self.reply.clone())
    }
}
