use anyhow::Context;
use db::DBService;
use server::{Deployment, api_router, config::Config};
use services::services::report_registry;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Fail fast on a template referencing an unknown dimension/metric id.
    if let Err(errors) = report_registry::validate() {
        for error in &errors {
            tracing::error!(%error, "report registry inconsistency");
        }
        anyhow::bail!("report registry failed validation ({} errors)", errors.len());
    }
    tracing::info!(templates = report_registry::registry_size(), "report registry loaded");

    let config = Config::from_env();
    let db = DBService::new(&config.database_url)
        .await
        .context("failed to open database")?;

    let app = api_router(Deployment::new(db));
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
