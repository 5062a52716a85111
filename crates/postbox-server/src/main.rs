use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::compression::CompressionLayer;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use postbox_db::{Database, MailboxStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "postbox_server=debug,postbox_skill=debug,postbox_db=debug,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let host = std::env::var("POSTBOX_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("POSTBOX_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;
    let db_path = std::env::var("POSTBOX_DB_PATH").unwrap_or_else(|_| "postbox.db".into());

    // Init database
    let db = Database::open(&PathBuf::from(&db_path))?;
    let store: Arc<dyn MailboxStore> = Arc::new(db);

    // The platform gzips bodies in both directions; unwrap requests and
    // compress replies around the webhook.
    let app = postbox_skill::router(store)
        .layer(RequestDecompressionLayer::new())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Skill webhook listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
