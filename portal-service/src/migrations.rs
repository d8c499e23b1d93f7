use anyhow::Context;

use crate::database::Database;

pub async fn run_migrations(database: &Database) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(database.pool())
        .await
        .context("failed to apply portal schema migrations")?;
    Ok(())
}
