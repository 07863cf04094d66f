//! DynamoDB Local integration suite.
//!
//! Run with `cargo xtask integration`, which starts the container and sets
//! `AWS_ENDPOINT_URL` before invoking
//! `cargo test -p singletable --features integration`.

use anyhow::{ensure, Context, Result};
use singletable::backend::{DynamoDbBackend, ItemBackend, TableAdmin};
use singletable::config::Config;
use singletable::lifecycle::{generate_table_name, TableManager};
use singletable::store::StoreError;
use singletable::testing::TestTable;
use singletable::{TableStatus, Tier, User};

async fn backend() -> Result<(DynamoDbBackend, Config)> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("singletable=debug")
        .with_test_writer()
        .try_init();

    let config = Config::from_env();
    ensure!(
        config.endpoint_url.is_some(),
        "AWS_ENDPOINT_URL must point at DynamoDB Local"
    );
    Ok((DynamoDbBackend::from_config(&config).await, config))
}

#[tokio::test]
async fn three_users_round_trip() -> Result<()> {
    let (backend, config) = backend().await?;
    let table = TestTable::setup(backend, config.provision)
        .await
        .context("provisioning test table")?;
    let store = table.store();

    let users = [
        ("first-id", Tier::Free),
        ("second-id", Tier::Free),
        ("third-id", Tier::Premium),
    ];

    let mut result = Ok(());
    for (id, tier) in users {
        let checked = async {
            store.create_user(id, tier).await?;
            let user = store.get_user(id).await?;
            ensure!(user == User::new(id, tier), "unexpected user {user:?}");
            Ok::<(), anyhow::Error>(())
        }
        .await;
        if let Err(e) = checked {
            result = Err(e);
            break;
        }
    }

    ensure!(table.cleanup().await.is_deleted(), "teardown failed");
    result
}

#[tokio::test]
async fn missing_item_is_not_found() -> Result<()> {
    let (backend, config) = backend().await?;

    let err = TestTable::run(backend, config.provision, |store| async move {
        store.get_user("never-written").await
    })
    .await?
    .expect_err("nothing was written");

    assert!(err.is_not_found(), "expected not found, got {err:?}");
    Ok(())
}

#[tokio::test]
async fn second_create_overwrites_first() -> Result<()> {
    let (backend, config) = backend().await?;

    let user = TestTable::run(backend, config.provision, |store| async move {
        store.create_user("first-id", Tier::Free).await?;
        store.create_user("first-id", Tier::Premium).await?;
        store.get_user("first-id").await
    })
    .await??;

    assert_eq!(user.tier, Tier::Premium);
    Ok(())
}

#[tokio::test]
async fn read_from_missing_table_is_read_error() -> Result<()> {
    let (backend, _) = backend().await?;
    let store = singletable::store::EntityStore::new(backend, generate_table_name());

    let err = store.get_user("first-id").await.expect_err("table is absent");

    assert!(matches!(err, StoreError::Read { .. }), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn teardown_removes_table() -> Result<()> {
    let (backend, config) = backend().await?;
    let manager = TableManager::new(backend.clone()).with_policy(config.provision);
    let name = generate_table_name();

    let table = manager.provision(&name).await?;
    assert_eq!(backend.describe_table(&name).await?, TableStatus::Active);
    assert!(backend.query(&name, "USER#nobody").await?.is_empty());

    assert!(manager.teardown(table).await.is_deleted());
    // DynamoDB Local deletes synchronously.
    assert!(backend.describe_table(&name).await.is_err());
    Ok(())
}
