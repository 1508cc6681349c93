use anyhow::Context;
use routegraph::{load_graph_file, PathServer, ServerConfig};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Routegraph v{}", routegraph::version());

    let config = ServerConfig::from_env()?;

    // The whole graph is loaded and frozen before anything is accepted
    let graph = load_graph_file(&config.graph_file)
        .with_context(|| format!("failed to load graph from {}", config.graph_file.display()))?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Serving shortest paths on {}", listener.local_addr()?);

    let server = PathServer::new(config, graph);
    server
        .serve_until(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
