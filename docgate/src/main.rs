use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use docgate::{
    backend::{StoreBackend, StoreBackendBuilder},
    config::{Args, BackendKind},
    memory::InMemoryStore,
    orchestrator::QueryOrchestrator,
    routes,
    state::AppState,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    match args.backend {
        BackendKind::Memory => serve(InMemoryStore::builder().build().await?, &args).await,
        #[cfg(feature = "mongodb")]
        BackendKind::Mongodb => {
            let store = docgate::mongodb::MongoDbStore::builder(&args.mongodb_uri, &args.mongodb_database)
                .build()
                .await?;
            serve(store, &args).await
        }
    }
}

async fn serve<B: StoreBackend + 'static>(backend: B, args: &Args) -> Result<(), BoxError> {
    let backend = Arc::new(backend);
    let mut state = AppState::new(backend.clone(), QueryOrchestrator::new(args.store_limit));

    match args.api_key() {
        Some(key) => state = state.with_api_key(key),
        None => warn!("no API key configured, document routes are open"),
    }

    let listener = TcpListener::bind(args.listen).await?;
    info!(
        address = %args.listen,
        backend = ?args.backend,
        store_limit = %args.store_limit,
        "docgate listening"
    );

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down");
    match Arc::try_unwrap(backend) {
        Ok(backend) => backend.shutdown().await?,
        Err(_) => warn!("backend still referenced, skipping shutdown"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
