mod cli;

use crate::cli::{Command, PurgeArgs, ServeArgs, StorageBackendArg, StoreArgs, CLI};
use anyhow::Context;
use clap::Parser;
use inkdrop_core::{PasteStore, SystemClock, TimeSource};
use inkdrop_gateway::state::body_limit_for;
use inkdrop_gateway::{App, AppState};
use inkdrop_generator::RandomGenerator;
use inkdrop_service::{PasteService, Pastebin, ServiceSettings};
use inkdrop_storage::{InMemoryPasteStore, RedisPasteStore, RedisStoreConfig};
use jiff::Timestamp;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CLI::parse();
    let _telemetry = inkdrop_telemetry::init(cli.telemetry.config())?;

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::PurgeExpired(args) => purge_expired(args).await,
    }
}

async fn connect_redis(store: &StoreArgs) -> anyhow::Result<RedisPasteStore> {
    let url = store
        .redis_url
        .as_deref()
        .context("redis url is required when storage backend is redis")?;
    let config = RedisStoreConfig::default().namespaced(&store.key_prefix);

    RedisPasteStore::connect(url, config)
        .await
        .context("failed to connect to redis")
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    info!(
        listen_addr = %args.listen_addr,
        storage_backend = %args.store.storage,
        max_content_bytes = args.max_content_bytes,
        test_mode = args.test_mode,
        "starting inkdrop"
    );

    match args.store.storage {
        StorageBackendArg::InMemory => run_server(&args, InMemoryPasteStore::new()).await,
        StorageBackendArg::Redis => {
            let store = connect_redis(&args.store).await?;
            run_server(&args, store).await
        }
    }
}

async fn run_server<S: PasteStore>(args: &ServeArgs, store: S) -> anyhow::Result<()> {
    let settings = ServiceSettings::builder()
        .max_content_bytes(args.max_content_bytes)
        .build();
    let service =
        PasteService::with_settings(Arc::new(store), RandomGenerator::default(), settings);

    if args.test_mode {
        warn!("test mode enabled, request time overrides are honored");
    }

    let state = AppState::new(Arc::new(service), TimeSource::new(SystemClock, args.test_mode))
        .with_public_base_url(args.public_base_url.clone())
        .with_body_limit(body_limit_for(args.max_content_bytes));

    let listener = tokio::net::TcpListener::bind(args.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", args.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn purge_expired(args: PurgeArgs) -> anyhow::Result<()> {
    let removed = match args.store.storage {
        StorageBackendArg::InMemory => {
            warn!("in-memory storage holds nothing between runs, nothing to purge");
            0
        }
        StorageBackendArg::Redis => {
            let store = connect_redis(&args.store).await?;
            let service = PasteService::new(store, RandomGenerator::default());
            service
                .purge_expired(Timestamp::now())
                .await
                .context("purge failed")?
        }
    };

    info!(removed, "purge complete");
    Ok(())
}
