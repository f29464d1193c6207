//! Application startup and lifecycle management.
//!
//! The model artifact is loaded before the listener binds; if that fails the
//! process never starts serving.

use crate::AppState;
use crate::config::DigitConfig;
use crate::handlers::health::{health_check, readiness_check};
use crate::handlers::predict::predict;
use crate::services::{Classifier, OnnxClassifier};
use axum::{
    Router,
    routing::{get, post},
};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(predict))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, loading the model artifact from the configured
    /// path exactly once.
    pub async fn build(config: DigitConfig) -> Result<Self, AppError> {
        let classifier = OnnxClassifier::load(&config.model.path).map_err(|e| {
            tracing::error!("Failed to load model artifact: {:#}", e);
            AppError::ConfigError(e)
        })?;

        tracing::info!(path = %config.model.path, "Loaded classifier artifact");

        Self::build_with_classifier(config, Arc::new(classifier)).await
    }

    /// Build with an already constructed classifier. Integration tests use
    /// this to inject a deterministic stub.
    pub async fn build_with_classifier(
        config: DigitConfig,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self, AppError> {
        let state = AppState { classifier };

        // Bind the listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Digit service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}
