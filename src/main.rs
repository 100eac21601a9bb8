use codegraph_query_engine::config::Config;
use codegraph_query_engine::{connect, default_guidance_provider, AppState};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(version = codegraph_query_engine::version(), "starting codegraph-query-engine");

    let (store, cache) = connect(&config).await?;
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    let state = AppState::new(store, cache, default_guidance_provider(), config);
    let sse_sessions = state.sse.clone();

    let app = codegraph_query_engine::http::router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sse_sessions))
        .await?;

    info!("shutdown complete");
    Ok(())
}

/// Waits for SIGINT/SIGTERM, then closes outstanding SSE streams with a
/// final "server shutting down" frame before the listener stops accepting
/// connections (spec §6 exit semantics).
async fn shutdown_signal(sessions: std::sync::Arc<codegraph_query_engine::sse::SseSessions>) {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("termination signal received, closing sse streams");
    sessions.shutdown();
}
