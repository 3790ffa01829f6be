//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the order handlers
//! - Wire up middleware (request observer with timeout, body limit, tracing)
//! - Bind server to listener and stop on shutdown

use axum::{
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::handlers::{create_order, delete_order, get_order, list_orders, update_order};
use crate::http::middleware::{request_logging_middleware, RequestLogging};
use crate::http::observer::RequestObserver;
use crate::observability::Logger;
use crate::orders::OrderService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    pub logger: Logger,
}

/// HTTP server for the order API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig, logger: Logger, orders: OrderService) -> Self {
        let state = AppState { orders, logger };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The observer is a route layer, so it only sees requests that matched
    /// a route and can read their path parameters. The request timeout is
    /// enforced inside it so timed-out requests still get a failure line.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let logging = RequestLogging::new(
            RequestObserver::new(state.logger.clone()),
            Duration::from_secs(config.request_timeout_secs),
        );

        Router::new()
            .route("/orders", get(list_orders).post(create_order))
            .route(
                "/orders/{id}",
                get(get_order).put(update_order).delete(delete_order),
            )
            .route_layer(middleware::from_fn_with_state(
                logging,
                request_logging_middleware,
            ))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(config.max_body_size)),
            )
    }

    /// The router, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.request_timeout_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
