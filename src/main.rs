use admin_bootstrap::config::Config;
use admin_bootstrap::db::AdminStorage;
use admin_bootstrap::service::{Lifecycle, SeedAdminTask, hasher_for};
use mimalloc::MiMalloc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        loglevel = %cfg.loglevel,
        seed = ?cfg.seed
    );

    let storage = AdminStorage::connect(&cfg.database_url).await?;
    storage.init_schema().await?;

    let hasher = hasher_for(&cfg.seed);
    let mut lifecycle = Lifecycle::new();
    lifecycle.register(SeedAdminTask::new(storage.clone(), cfg.seed.clone(), hasher));

    let readiness = match lifecycle.run_startup().await {
        Ok(readiness) => readiness,
        Err(e) => {
            error!(error = %e, "startup aborted");
            return Err(e.into());
        }
    };

    info!(ready = readiness.is_ready(), "waiting for shutdown signal");
    tokio::signal::ctrl_c().await?;
    storage.pool().close().await;
    info!("shutdown complete");
    Ok(())
}
