//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the logger from the logging config
//! - Create the order store and seed demo data when enabled
//! - Assemble the HTTP server
//!
//! # Design Decisions
//! - Fail fast: configuration errors surface before anything is built
//! - Subsystems initialize in order: logger, orders, server

use std::sync::Arc;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::observability::Logger;
use crate::orders::{demo_orders, InMemoryOrderRepository, OrderService};

/// Everything `main` needs to serve traffic.
pub struct Application {
    pub logger: Logger,
    pub orders: OrderService,
    pub server: HttpServer,
}

/// Build the application from a validated config.
pub fn build(config: &AppConfig) -> Application {
    let logger = Logger::new(&config.logging);
    build_with_logger(config, logger)
}

/// Build the application around an existing logger.
pub fn build_with_logger(config: &AppConfig, logger: Logger) -> Application {
    let orders = OrderService::new(Arc::new(InMemoryOrderRepository::new()), logger.clone());
    if config.orders.seed_demo_data {
        orders.seed(demo_orders());
    }

    let server = HttpServer::new(config.server.clone(), logger.clone(), orders.clone());
    logger.info(
        format!("Order service configured on {}", config.server.bind_address),
        "STARTUP",
    );

    Application {
        logger,
        orders,
        server,
    }
}
