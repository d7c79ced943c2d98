use std::{path::PathBuf, str::FromStr};

use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use storefront_user::{Command, RegisterInput, SqliteCredentialStore};

pub struct TestState {
    pub pool: SqlitePool,
    pub command: Command,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    storefront_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(TestState {
        command: Command::new(SqliteCredentialStore::new(pool.clone())),
        pool,
    })
}

#[allow(dead_code)]
pub async fn create_user(state: &TestState, name: impl Into<String>) -> anyhow::Result<String> {
    let name = name.into();
    let credential = state
        .command
        .register(RegisterInput {
            username: name.to_owned(),
            email: format!("{name}@storefront.localhost"),
            password: "my_password".to_owned(),
        })
        .await?;

    Ok(credential.id)
}
