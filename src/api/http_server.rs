// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    detect_objects_handler, detect_text_handler, get_audio_by_id_handler, get_audio_handler,
    health_handler, home_handler,
};
use crate::config::{ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crate::speech::SpeechSynthesizer;
use crate::storage::AudioStore;
use crate::vision::VisionModelManager;

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub vision: Arc<VisionModelManager>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub audio_store: Arc<AudioStore>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        vision: Arc<VisionModelManager>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        audio_store: Arc<AudioStore>,
    ) -> Self {
        Self {
            vision,
            synthesizer,
            audio_store,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_config(mut self, config: &ServerConfig) -> Self {
        self.max_upload_bytes = config.max_upload_bytes;
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}

/// Build the router with all routes and layers
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        // Liveness and health
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        // Analysis endpoints
        .route("/detect_objects", post(detect_objects_handler))
        .route("/detect_text", post(detect_text_handler))
        // Audio retrieval
        .route("/get_audio", get(get_audio_handler))
        .route("/get_audio/:id", get(get_audio_by_id_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl+C
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
