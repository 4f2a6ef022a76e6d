//! Configuration service: version numbering, activation, and fallback policy.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use modelgate_data::{self as data, NewConfigRow};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{instrument, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ConfigVersion, EffectiveConfig, NewConfigVersion, PublishOutcome};
use crate::validate::{clamp_history_limit, validate_new_version};

/// Abstraction over the configuration backend used by the API layer.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Validate and persist a new configuration version. The new version is
    /// inert until explicitly published.
    async fn create_version(&self, input: NewConfigVersion) -> Result<ConfigVersion>;
    /// Atomically make the version with `id` the only active one.
    async fn publish_version(&self, id: i64) -> Result<PublishOutcome>;
    /// The currently active version, if any.
    async fn active_version(&self) -> Result<Option<ConfigVersion>>;
    /// Recent versions, newest first.
    async fn list_versions(&self, limit: Option<i64>) -> Result<Vec<ConfigVersion>>;
    /// The configuration that applies right now: the active version, or the
    /// hard-coded fallback when none is active.
    async fn resolve_effective(&self) -> Result<EffectiveConfig>;
}

/// Concrete implementation backed by `PostgreSQL` + `SQLx`.
#[derive(Clone)]
pub struct ConfigService {
    pool: PgPool,
}

impl ConfigService {
    /// Establish a connection pool and ensure migrations are applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the `PostgreSQL` connection cannot be established
    /// or migrations fail to run.
    #[instrument(name = "config_service.new", skip(database_url))]
    pub async fn new(database_url: impl Into<String>) -> Result<Self> {
        let database_url = database_url.into();
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&database_url)
            .await
            .with_context(|| "failed to connect to PostgreSQL for configuration service")?;

        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, ensuring migrations are applied.
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail to run.
    pub async fn with_pool(pool: PgPool) -> Result<Self> {
        data::run_migrations(&pool)
            .await
            .context("failed to apply configuration store migrations")?;
        Ok(Self { pool })
    }

    /// Access the underlying `SQLx` connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Validate and insert a new version; see [`ConfigStore::create_version`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidField` when a constraint is violated (no
    /// row is inserted) or `ConfigError::DataAccess` on storage failure.
    pub async fn create_version(&self, input: NewConfigVersion) -> ConfigResult<ConfigVersion> {
        validate_new_version(&input)?;

        let row = data::insert_config(
            &self.pool,
            &NewConfigRow {
                model: input.model.trim(),
                temperature: input.temperature,
                max_tokens: input.max_tokens,
                system_prompt: &input.system_prompt,
            },
        )
        .await
        .map_err(|source| ConfigError::data("insert_config", source))?;

        Ok(row.into())
    }

    /// Activate the version with `id`; see [`ConfigStore::publish_version`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::VersionNotFound` when no row has the id (no flag
    /// changes in that case) or `ConfigError::DataAccess` on storage failure.
    pub async fn publish_version(&self, id: i64) -> ConfigResult<PublishOutcome> {
        let row = data::activate_config(&self.pool, id)
            .await
            .map_err(|source| ConfigError::data("activate_config", source))?
            .ok_or(ConfigError::VersionNotFound { id })?;

        Ok(PublishOutcome {
            status: "ok".to_string(),
            active_id: row.id,
            active_version: row.version,
        })
    }

    /// The currently active version, if any.
    ///
    /// More than one active row violates the store invariant; the anomaly is
    /// logged and resolved deterministically on the highest storage id so the
    /// answer is never ambiguous to the caller.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DataAccess` on storage failure.
    pub async fn active_version(&self) -> ConfigResult<Option<ConfigVersion>> {
        let mut rows = data::fetch_active_configs(&self.pool)
            .await
            .map_err(|source| ConfigError::data("fetch_active_configs", source))?;

        if rows.len() > 1 {
            warn!(
                active_rows = rows.len(),
                resolved_id = rows[0].id,
                "multiple active configuration rows; resolving to highest id"
            );
        }

        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0).into())
        })
    }

    /// Recent versions, newest first; `limit` defaults to 20, clamped to 200.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DataAccess` on storage failure.
    pub async fn list_versions(&self, limit: Option<i64>) -> ConfigResult<Vec<ConfigVersion>> {
        let rows = data::list_configs(&self.pool, clamp_history_limit(limit))
            .await
            .map_err(|source| ConfigError::data("list_configs", source))?;
        Ok(rows.into_iter().map(ConfigVersion::from).collect())
    }

    /// The configuration to use for a completion call right now.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DataAccess` on storage failure.
    pub async fn resolve_effective(&self) -> ConfigResult<EffectiveConfig> {
        Ok(self
            .active_version()
            .await?
            .map_or_else(EffectiveConfig::fallback, EffectiveConfig::from))
    }
}

#[async_trait]
impl ConfigStore for ConfigService {
    async fn create_version(&self, input: NewConfigVersion) -> Result<ConfigVersion> {
        Ok(Self::create_version(self, input).await?)
    }

    async fn publish_version(&self, id: i64) -> Result<PublishOutcome> {
        Ok(Self::publish_version(self, id).await?)
    }

    async fn active_version(&self) -> Result<Option<ConfigVersion>> {
        Ok(Self::active_version(self).await?)
    }

    async fn list_versions(&self, limit: Option<i64>) -> Result<Vec<ConfigVersion>> {
        Ok(Self::list_versions(self, limit).await?)
    }

    async fn resolve_effective(&self) -> Result<EffectiveConfig> {
        Ok(Self::resolve_effective(self).await?)
    }
}
