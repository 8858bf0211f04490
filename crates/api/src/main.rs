use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pm_api::config::ServerConfig;
use pm_api::router::build_app_router;
use pm_api::state::AppState;
use pm_db::schema;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        host = %config.host,
        port = %config.port,
        env = ?config.app_env,
        database = ?config.database,
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = pm_db::create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    pm_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    if config.reset_schema {
        if config.app_env.is_production() {
            bail!("RESET_SCHEMA is refused when APP_ENV is production");
        }
        tracing::warn!("RESET_SCHEMA set, dropping all tables");
        schema::drop_all(&pool)
            .await
            .context("Failed to drop tables")?;
    }

    schema::migrate(&pool)
        .await
        .context("Failed to apply schema")?;
    tracing::info!("Database schema ready");

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse()
        .with_context(|| format!("Invalid SERVER_HOST address {:?}", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    {
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .into_future();
        tokio::pin!(server);

        // Serve until a signal arrives, then give in-flight requests a bounded
        // grace period to finish.
        tokio::select! {
            result = &mut server => result.context("Server error")?,
            () = shutdown.cancelled() => {
                match tokio::time::timeout(grace, &mut server).await {
                    Ok(result) => result.context("Server error")?,
                    Err(_) => tracing::warn!(
                        grace_secs = config.shutdown_timeout_secs,
                        "Grace period elapsed with requests still in flight"
                    ),
                }
            }
        }
    }

    // --- Post-shutdown cleanup ---
    // Connections still checked out after the grace period are dropped when
    // the runtime exits.
    tracing::info!("Server stopped accepting connections, closing database pool");
    if !pm_db::close_pool(&pool, grace).await {
        tracing::warn!(
            grace_secs = config.shutdown_timeout_secs,
            "Database pool did not close in time, dropping remaining connections"
        );
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter;
/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pm_api=debug,pm_db=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
