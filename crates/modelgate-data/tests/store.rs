use modelgate_data::{
    NewConfigRow, activate_config, fetch_active_configs, fetch_config_by_id, insert_config,
    list_configs, run_migrations,
};
use modelgate_test_support::postgres::start_postgres;
use sqlx::postgres::PgPoolOptions;

fn sample_row<'a>(model: &'a str) -> NewConfigRow<'a> {
    NewConfigRow {
        model,
        temperature: 0.7,
        max_tokens: 1000,
        system_prompt: "",
    }
}

#[tokio::test]
async fn store_assigns_versions_and_activates_atomically() -> anyhow::Result<()> {
    let postgres = match start_postgres() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("skipping store_assigns_versions_and_activates_atomically: {err}");
            return Ok(());
        }
    };
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(postgres.connection_string())
        .await?;
    run_migrations(&pool).await?;

    let first = insert_config(&pool, &sample_row("openai/gpt-4o-mini")).await?;
    assert_eq!(first.version, 1);
    assert!(!first.is_active, "new rows must start inactive");

    let second = insert_config(&pool, &sample_row("anthropic/claude-3-haiku")).await?;
    assert_eq!(second.version, 2);
    assert_ne!(first.id, second.id);

    assert!(
        fetch_active_configs(&pool).await?.is_empty(),
        "nothing should be active before the first publish"
    );

    let activated = activate_config(&pool, second.id)
        .await?
        .expect("target row exists");
    assert!(activated.is_active);
    assert_eq!(activated.id, second.id);

    let active = fetch_active_configs(&pool).await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.id);

    // Re-pointing activation moves the flag in one step.
    activate_config(&pool, first.id)
        .await?
        .expect("target row exists");
    let active = fetch_active_configs(&pool).await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, first.id);

    let stale = fetch_config_by_id(&pool, second.id)
        .await?
        .expect("row persists");
    assert!(!stale.is_active);

    Ok(())
}

#[tokio::test]
async fn activate_missing_id_leaves_flags_untouched() -> anyhow::Result<()> {
    let postgres = match start_postgres() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("skipping activate_missing_id_leaves_flags_untouched: {err}");
            return Ok(());
        }
    };
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(postgres.connection_string())
        .await?;
    run_migrations(&pool).await?;

    let row = insert_config(&pool, &sample_row("openai/gpt-4o")).await?;
    activate_config(&pool, row.id).await?.expect("row exists");

    let missing = activate_config(&pool, row.id + 1000).await?;
    assert!(missing.is_none());

    let active = fetch_active_configs(&pool).await?;
    assert_eq!(active.len(), 1, "prior active row must survive a missing id");
    assert_eq!(active[0].id, row.id);

    Ok(())
}

#[tokio::test]
async fn list_orders_newest_first_and_honours_limit() -> anyhow::Result<()> {
    let postgres = match start_postgres() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("skipping list_orders_newest_first_and_honours_limit: {err}");
            return Ok(());
        }
    };
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(postgres.connection_string())
        .await?;
    run_migrations(&pool).await?;

    for model in ["m1", "m2", "m3"] {
        insert_config(&pool, &sample_row(model)).await?;
    }

    let rows = list_configs(&pool, 2).await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].model, "m3");
    assert_eq!(rows[1].model, "m2");
    assert!(rows[0].id > rows[1].id);

    Ok(())
}
