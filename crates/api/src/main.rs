use std::sync::Arc;

use anyhow::Context;

use stockbook_api::app::{AppServices, build_app};
use stockbook_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockbook_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = Arc::new(AppServices::from_config(&config));
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
