/*
 * Responsibility
 * - Config読み込み → 依存生成 (auth service client / TokenGate) → Router 組み立て
 * - Middleware の適用 (token gate / http)
 * - axum::serve() で起動, SIGTERM / Ctrl-C で graceful shutdown
 */
use std::panic;

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppEnv, Config};
use crate::error::AppError;
use crate::services::auth::build_token_gate;
use crate::state::AppState;
use crate::{api, middleware};

const DEFAULT_LOG_FILTER: &str = "info,edge_gateway=info,tower_http=info";

fn init_tracing() {
    // RUST_LOG wins, e.g. RUST_LOG=info,edge_gateway=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Route panics through tracing. The process keeps running: a panicking
/// validator is caught by the gate and answered with 500.
fn init_panic_hook(app_env: AppEnv) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "-".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "-".to_string());

        tracing::error!(%location, %payload, "panic");

        // Development also gets the default stderr report (backtrace hint).
        if !app_env.is_production() {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().map_err(AppError::from)?;

    init_panic_hook(config.app_env);

    tracing::info!(
        "starting edge gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("edge gateway stopped");
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState, AppError> {
    let gate = build_token_gate(config)?;
    Ok(AppState::new(gate))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let gated = middleware::auth::gate::apply(api::gated_routes(), state.clone());

    let router = Router::new()
        .merge(api::public_routes())
        .merge(gated)
        .with_state(state);

    middleware::http::apply(router, config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
