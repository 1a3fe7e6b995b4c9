// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::{
    health::health_handler,
    login::login_handler,
    middleware::require_identity,
    predict::{predict_handler, preflight_handler},
};
use crate::auth::AuthGate;
use crate::vision::{image_utils::MAX_IMAGE_SIZE, Detector, ImageAcquirer};

/// Request bodies may carry a full-size image plus multipart framing
pub const MAX_REQUEST_BODY: usize = MAX_IMAGE_SIZE + 2 * 1024 * 1024;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthGate>,
    pub acquirer: Arc<ImageAcquirer>,
    pub detector: Arc<dyn Detector>,
    pub model_name: String,
}

impl AppState {
    pub fn new(
        auth: AuthGate,
        acquirer: ImageAcquirer,
        detector: Arc<dyn Detector>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            auth: Arc::new(auth),
            acquirer: Arc::new(acquirer),
            detector,
            model_name: model_name.into(),
        }
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn create_app(state: AppState) -> Router {
    // Only POST is guarded; the OPTIONS handler is added after the layer
    let predict = post(predict_handler)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity,
        ))
        .options(preflight_handler);

    Router::new()
        // Health check
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        // Session login
        .route("/login", post(login_handler))
        // Object detection
        .route("/predict", predict)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Detection API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Detection API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
