//! FOB contest binary entrypoint wiring the REST surface, SQLite storage and the countdown task.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fob_contest::{
    config::AppConfig,
    dao::contest_store::sqlite::{SqliteConfig, SqliteContestStore},
    routes,
    services::{
        countdown,
        notifier::{MemoryNotifier, Notifier},
        presence,
    },
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = SqliteContestStore::open(SqliteConfig::new(config.database_path.clone()))
        .with_context(|| format!("opening database {}", config.database_path.display()))?;
    let notifier = build_notifier(&config)?;

    let app_state = AppState::new(config, Arc::new(store), notifier);

    presence::announce_online(&app_state).await;
    tokio::spawn(countdown::run(app_state.clone()));
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick the outbound chat channel: Discord when a bot token is configured, in-memory otherwise.
fn build_notifier(config: &AppConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    #[cfg(feature = "discord")]
    {
        if let Some(token) = config.discord_bot_token.as_deref() {
            let notifier = fob_contest::services::notifier::DiscordNotifier::new(
                &config.discord_api_base,
                token,
            )
            .context("building Discord client")?;
            info!(api = %config.discord_api_base, "posting announcements to Discord");
            return Ok(Arc::new(notifier));
        }
    }

    if config.discord_bot_token.is_some() {
        warn!("DISCORD_BOT_TOKEN is set but the `discord` feature is disabled; messages stay in memory");
    } else {
        info!("no Discord bot token configured; messages stay in memory");
    }
    Ok(Arc::new(MemoryNotifier::new()))
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "cannot install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
