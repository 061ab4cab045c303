use std::{net::SocketAddr, time::Duration};

use attendify::{
    auth::{jwt::JwtKeys, password::PasswordHasher},
    config::{AppConfig, validate},
    db::{connection, dao::DaoContext},
    logging::init_tracing,
    routes::app,
    services::ServiceContext,
    shutdown::wait_for_shutdown,
    state::AppState,
};
use tokio::sync::oneshot;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    // No subscriber exists yet, so config problems go straight to stderr.
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("attendify: configuration error: {err:?}");
            std::process::exit(1);
        }
    };
    init_tracing(&cfg.rust_log, cfg.environment);

    if let Err(err) = run(cfg).await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    for warning in validate::warnings(&cfg) {
        tracing::warn!("{warning}");
    }

    let db = connection::connect(&cfg).await?;
    let repos = DaoContext::new(&db).repositories();
    let services = ServiceContext::new(
        &repos,
        JwtKeys::from_secret(cfg.jwt_secret.as_bytes()),
        PasswordHasher::default(),
    );
    let state = AppState::new(cfg, services, repos.health.clone());

    let addr: SocketAddr = state.config.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(environment = ?state.config.environment, "listening on http://{}", addr);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let router = app(state);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined??;
            tracing::warn!("server stopped without a shutdown signal");
        }
        signal = wait_for_shutdown() => {
            signal?;
            let _ = stop_tx.send(());
            match tokio::time::timeout(DRAIN_TIMEOUT, &mut server).await {
                Ok(joined) => joined??,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = DRAIN_TIMEOUT.as_secs(),
                        "in-flight requests did not finish before the drain timeout"
                    );
                    server.abort();
                }
            }
        }
    }

    db.close().await?;
    tracing::info!("database pool closed, bye");
    Ok(())
}
