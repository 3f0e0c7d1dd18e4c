use anyhow::Context;

use crate::database::manager::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    DatabaseManager::apply_schema()
        .await
        .context("failed to apply database schema")?;

    println!("Database schema applied");
    Ok(())
}
