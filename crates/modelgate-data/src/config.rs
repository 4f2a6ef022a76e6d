//! Configuration schema migrations and query helpers for the version store.

use crate::error::{DataError, Result};
use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, PgPool, Postgres};

/// Advisory lock key that serializes version assignment and activation.
///
/// Every transaction that mutates `model_configs` takes this transaction-scoped
/// lock first, so concurrent creates cannot observe the same version maximum
/// and concurrent publishes cannot interleave their deactivate/activate steps.
const MODEL_CONFIGS_LOCK: i64 = 0x4d47_434f_4e46;

fn map_query_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DataError {
    move |source| DataError::QueryFailed { operation, source }
}

/// Apply all configuration-store migrations.
///
/// # Errors
///
/// Returns an error when migration execution fails.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    let mut migrator = sqlx::migrate!("./migrations");
    migrator.set_ignore_missing(true);
    migrator
        .run(pool)
        .await
        .map_err(|source| DataError::MigrationFailed { source })?;
    Ok(())
}

/// Raw projection of the `model_configs` table.
#[derive(Debug, Clone, FromRow)]
pub struct ConfigVersionRow {
    /// Storage identity, assigned by the database, never reused.
    pub id: i64,
    /// Human-facing version number, assigned as `max(existing) + 1`.
    pub version: i64,
    /// Upstream model identifier.
    pub model: String,
    /// Sampling temperature in `[0.0, 1.0]`.
    pub temperature: f64,
    /// Completion token budget in `(0, 32768]`.
    pub max_tokens: i32,
    /// System instruction; empty means none.
    pub system_prompt: String,
    /// Whether this row is the active configuration.
    pub is_active: bool,
    /// Creation timestamp, immutable after insert.
    pub created_at: DateTime<Utc>,
}

/// Field values for a new configuration row.
#[derive(Debug, Clone, Copy)]
pub struct NewConfigRow<'a> {
    /// Upstream model identifier.
    pub model: &'a str,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token budget.
    pub max_tokens: i32,
    /// System instruction.
    pub system_prompt: &'a str,
}

/// Insert a new configuration row with the next version number.
///
/// Runs in a transaction under the store's advisory lock so the computed
/// `max(version) + 1` is race-free; the new row is inserted inactive and no
/// other row is touched.
///
/// # Errors
///
/// Returns an error when the transaction or any statement fails.
pub async fn insert_config(pool: &PgPool, new_row: &NewConfigRow<'_>) -> Result<ConfigVersionRow> {
    let mut tx = pool.begin().await.map_err(map_query_err("insert_config.begin"))?;
    acquire_store_lock(&mut tx).await?;

    let row = sqlx::query_as::<_, ConfigVersionRow>(
        "INSERT INTO model_configs (version, model, temperature, max_tokens, system_prompt) \
         SELECT COALESCE(MAX(version), 0) + 1, $1, $2, $3, $4 FROM model_configs \
         RETURNING id, version, model, temperature, max_tokens, system_prompt, is_active, created_at",
    )
    .bind(new_row.model)
    .bind(new_row.temperature)
    .bind(new_row.max_tokens)
    .bind(new_row.system_prompt)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_query_err("insert_config"))?;

    tx.commit().await.map_err(map_query_err("insert_config.commit"))?;
    Ok(row)
}

/// Atomically make the row with `id` the only active configuration.
///
/// Deactivates every other active row and activates the target inside one
/// transaction; readers observe either the pre-publish or the post-publish
/// state, never an intermediate one. Returns `None` (and rolls back, leaving
/// every flag untouched) when no row has the requested id.
///
/// # Errors
///
/// Returns an error when the transaction or any statement fails.
pub async fn activate_config(pool: &PgPool, id: i64) -> Result<Option<ConfigVersionRow>> {
    let mut tx = pool
        .begin()
        .await
        .map_err(map_query_err("activate_config.begin"))?;
    acquire_store_lock(&mut tx).await?;

    sqlx::query("UPDATE model_configs SET is_active = FALSE WHERE is_active AND id <> $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_query_err("activate_config.deactivate"))?;

    let row = sqlx::query_as::<_, ConfigVersionRow>(
        "UPDATE model_configs SET is_active = TRUE WHERE id = $1 \
         RETURNING id, version, model, temperature, max_tokens, system_prompt, is_active, created_at",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(map_query_err("activate_config.activate"))?;

    match row {
        Some(row) => {
            tx.commit()
                .await
                .map_err(map_query_err("activate_config.commit"))?;
            Ok(Some(row))
        }
        None => {
            tx.rollback()
                .await
                .map_err(map_query_err("activate_config.rollback"))?;
            Ok(None)
        }
    }
}

/// Fetch every active row, newest storage id first.
///
/// The invariant is at most one active row; callers treat additional rows as a
/// consistency anomaly and resolve deterministically on the highest id.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn fetch_active_configs<'e, E>(executor: E) -> Result<Vec<ConfigVersionRow>>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, ConfigVersionRow>(
        "SELECT id, version, model, temperature, max_tokens, system_prompt, is_active, created_at \
         FROM model_configs WHERE is_active ORDER BY id DESC",
    )
    .fetch_all(executor)
    .await
    .map_err(map_query_err("fetch_active_configs"))
}

/// Fetch a single row by storage id.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn fetch_config_by_id<'e, E>(executor: E, id: i64) -> Result<Option<ConfigVersionRow>>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, ConfigVersionRow>(
        "SELECT id, version, model, temperature, max_tokens, system_prompt, is_active, created_at \
         FROM model_configs WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(map_query_err("fetch_config_by_id"))
}

/// List rows newest storage id first, bounded by `limit`.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn list_configs<'e, E>(executor: E, limit: i64) -> Result<Vec<ConfigVersionRow>>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, ConfigVersionRow>(
        "SELECT id, version, model, temperature, max_tokens, system_prompt, is_active, created_at \
         FROM model_configs ORDER BY id DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(executor)
    .await
    .map_err(map_query_err("list_configs"))
}

async fn acquire_store_lock(tx: &mut sqlx::Transaction<'_, Postgres>) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MODEL_CONFIGS_LOCK)
        .execute(&mut **tx)
        .await
        .map_err(map_query_err("acquire_store_lock"))?;
    Ok(())
}
