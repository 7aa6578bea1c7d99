use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use portico_server::clients::{DomainClient, ProfileClient};
use portico_server::config::load_config;
use portico_server::messaging::{AmqpEventPublisher, DisabledEventPublisher, EventPublisher};
use portico_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting portico gateway");

    // Load configuration
    let config_path =
        std::env::var("PORTICO_CONFIG").unwrap_or_else(|_| "gateway-config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;

    // One shared HTTP client with an explicit timeout; the downstream
    // services are plain JSON-over-HTTP and get no retries.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let domain = DomainClient::new(http.clone(), &config.domain_service);
    let profile = ProfileClient::new(http, &config.perfil_service);

    // Deletion events are best-effort end to end: an unreachable broker
    // downgrades to a disabled publisher instead of failing startup.
    let events: Arc<dyn EventPublisher> = match &config.amqp {
        Some(amqp) => match AmqpEventPublisher::connect(&amqp.url).await {
            Ok(publisher) => {
                tracing::info!("Connected to AMQP broker");
                Arc::new(publisher)
            }
            Err(e) => {
                tracing::warn!("AMQP unreachable, deletion events disabled: {:#}", e);
                Arc::new(DisabledEventPublisher)
            }
        },
        None => {
            tracing::info!("AMQP not configured, deletion events disabled");
            Arc::new(DisabledEventPublisher)
        }
    };

    let listen = config.listen.clone();
    let state = AppState::new(config, domain, profile, events);

    // Build router
    let app = portico_server::web::build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;

    tracing::info!("Gateway listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
