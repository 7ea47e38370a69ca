//! HTTP surface for the intake pipeline.
//!
//! Routes:
//! - `GET /ping` health check
//! - `POST /v1/survey` submission intake, with CORS headers
//!
//! [`router`] takes an explicit [`ServerConfig`] and the shared
//! [`AppState`]; there is no global application object.

mod cors;
mod handlers;
mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use mockable::Clock;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::intake::IntakeProcessor;

pub use handlers::{ping, submit_survey};

/// State shared by every request: the processor and the clock.
#[derive(Clone)]
pub struct AppState {
    processor: Arc<IntakeProcessor>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("processor", &self.processor)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Bundle a processor with the clock used for health responses.
    #[must_use]
    pub fn new(processor: Arc<IntakeProcessor>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { processor, clock }
    }
}

/// Wire the routes.
///
/// # Errors
///
/// Returns an error if `cors_allowed_origin` is not a valid header value.
pub fn router(config: &ServerConfig, state: AppState) -> Result<Router> {
    let origin = HeaderValue::from_str(&config.cors_allowed_origin).map_err(|_| {
        Error::config_validation(format!(
            "invalid cors_allowed_origin: {:?}",
            config.cors_allowed_origin
        ))
    })?;

    let v1 = Router::new()
        .route("/survey", post(submit_survey))
        .layer(middleware::from_fn_with_state(origin, cors::cors));

    Ok(Router::new()
        .route("/ping", get(ping))
        .nest("/v1", v1)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state))
}

/// Serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
