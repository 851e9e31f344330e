/*
 * Responsibility
 * - load Config, build dependencies, assemble the Router
 * - tracing + panic hook set-up
 * - axum::serve() with graceful shutdown
 */
use std::panic;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Extension, Router};
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{Dispatcher, dispatch};
use crate::config::Config;
use crate::middleware::{self, cors};
use crate::repos::{self, Repos};
use crate::services::images::LocalImageStore;
use crate::services::mailer::LogMailer;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,givebridge_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");
        // The request-level CatchPanicLayer answers 500; the server keeps running.
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    init_panic_hook();

    let config = Config::from_env()?;
    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(config).await?;
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(state.config.addr)
        .await
        .with_context(|| format!("bind {}", state.config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: Config) -> Result<AppState> {
    let repos = match &config.database_url {
        Some(url) => {
            let pool = repos::postgres::connect(url, config.database_max_connections)
                .await
                .context("connect to postgres")?;
            tracing::info!("using postgres repositories");
            Repos::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; data is kept in memory and lost on restart");
            Repos::memory()
        }
    };

    let images = LocalImageStore::new(config.upload_dir.clone(), config.public_base_url.clone());
    tokio::fs::create_dir_all(images.root())
        .await
        .with_context(|| format!("create upload dir {}", images.root().display()))?;

    Ok(AppState::new(
        config,
        repos,
        Arc::new(LogMailer),
        Arc::new(images),
    ))
}

/// `/uploads/*` is served from disk; every other path goes to the dispatcher.
pub fn build_router(state: AppState) -> Router {
    build_router_with(state, Dispatcher::standard())
}

/// Same stack around a caller-supplied dispatcher.
pub fn build_router_with(state: AppState, dispatcher: Dispatcher) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);
    let config = state.config.clone();

    let router = Router::new()
        .nest_service(&format!("/{}", LocalImageStore::URL_PREFIX), uploads)
        .fallback(dispatch)
        .layer(Extension(Arc::new(dispatcher)))
        // outermost app layer: preflight never reaches ServeDir or a module
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            cors::answer_preflight,
        ))
        .with_state(state);

    middleware::http::apply(router, &config)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        // without a signal handler, never resolve: keep serving
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
