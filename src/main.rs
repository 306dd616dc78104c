use ringgate::application::{AutoTerminator, RingService};
use ringgate::config::Config;
use ringgate::domain::call::CallTransport;
use ringgate::domain::user::IdentityResolver;
use ringgate::infrastructure::{InMemoryDirectory, LoopbackTransport};
use ringgate::interface::api::{build_router, init_metrics, ActionRouter, AppState, CallPrivateRing};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref())?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting RingGate");
    info!("Configuration loaded: {:?}", config);

    // Collaborators
    let directory = InMemoryDirectory::from_entries(config.directory.entries.clone());
    info!("Identity directory seeded with {} entries", directory.len().await);
    let resolver: Arc<dyn IdentityResolver> = Arc::new(directory);
    let transport: Arc<dyn CallTransport> = Arc::new(LoopbackTransport::new());

    let (terminator, terminator_worker) = AutoTerminator::start(transport.clone());
    let ring_service = Arc::new(RingService::new(resolver, transport, terminator.clone()));

    let mut actions = ActionRouter::new();
    actions.register(Arc::new(CallPrivateRing::new(ring_service)));

    info!("Initializing Prometheus metrics exporter");
    let prometheus_handle = init_metrics()?;

    let state = AppState {
        actions: Arc::new(actions),
        terminator,
    };
    let app = build_router(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("API server listening on {}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutting down..."),
                Err(e) => error!("Failed to listen for shutdown signal, shutting down: {}", e),
            }
        })
        .await?;

    // Router state is gone; wait for calls still ringing to be cancelled
    terminator_worker.await?;

    Ok(())
}
