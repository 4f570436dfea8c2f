mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::database;
use crate::core::server::{self, AppServices};
use crate::modules::storage::LocalPhotoStorage;
use crate::modules::store::{MemoryReportStore, PgReportStore, ReportStore};
use crate::shared::timezone::TimeZoneResolver;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Configuration loaded (tokio_worker_threads={}, pid={})",
        worker_threads,
        std::process::id()
    );

    let store = open_store(&config).await?;
    let existing = store
        .count_reports()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count stored reports: {}", e))?;
    tracing::info!("Report store ready ({} existing reports)", existing);

    let resolver = TimeZoneResolver::new(&config.timezone);
    tracing::info!(
        "Default time zone resolved to {}",
        resolver.default_zone().name()
    );

    let photos = Arc::new(
        LocalPhotoStorage::new(&config.upload)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to prepare upload folder: {}", e))?,
    );
    tracing::info!("Photo uploads stored under {}", photos.folder().display());

    let services = AppServices::new(
        Arc::clone(&store),
        resolver,
        photos,
        &config.app.qr_base_url,
    );

    if config.app.seed_default_restrooms {
        let seeded = services
            .restrooms
            .seed_defaults()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed restrooms: {}", e))?;
        tracing::info!("Seeded {} default restrooms", seeded);
    }

    let app = server::build_router(&config, &services);

    let addr = config.app.server_address();
    let listener = server::bind_listener(&addr)?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    store.close().await;
    tracing::info!("Report store closed");

    Ok(())
}

/// Postgres when a database URL is configured, the in-memory store otherwise
async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn ReportStore>> {
    let Some(url) = config.database.url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, reports are kept in memory only");
        return Ok(Arc::new(MemoryReportStore::new()));
    };

    let pool = database::create_pool(&config.database, url).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    Ok(Arc::new(PgReportStore::new(pool)))
}
