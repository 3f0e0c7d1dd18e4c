use crate::config;

pub async fn handle() -> anyhow::Result<()> {
    let config = config::config();
    tracing::info!("Starting Estate API in {:?} mode", config.environment);

    crate::routes::serve().await
}
