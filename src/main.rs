use chrono::Utc;
use mood_tracker::{
    AppState, Config, FileStore, KeyValueStore, Session,
    reminder::{self, LocalScheduler},
    router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    fs::create_dir_all(&config.data_dir).await?;

    let interval = config.reminder_interval;
    tokio::spawn(async move {
        let scheduler = LocalScheduler::new();
        reminder::bootstrap(&scheduler, interval, Utc::now()).await;
    });

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));
    let session = Session::load(store.as_ref(), Utc::now()).await;
    info!(
        entries = session.entries.len(),
        data_dir = %config.data_dir.display(),
        "loaded mood data"
    );
    let app = router(AppState::new(store, session));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
