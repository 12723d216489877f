//! exporter-api — HTTP surface of the Slurm exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition |
//! | GET | `/healthz` | Liveness probe |
//! | GET | `/api/v1/nodes` | Current node-state snapshot |
//! | GET | `/api/v1/users` | Current per-user job snapshot |
//!
//! Every request re-runs the Slurm commands; nothing is cached.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use exporter_metrics::{CommandRunner, CommandSpec, NodesCollector, Registry, UsersCollector};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Registry,
    pub nodes: Arc<NodesCollector>,
    pub users: Arc<UsersCollector>,
}

impl ApiState {
    /// Build both collectors on one runner and register them.
    pub fn new(runner: Arc<dyn CommandRunner>, sinfo: CommandSpec, squeue: CommandSpec) -> Self {
        let nodes = Arc::new(NodesCollector::new(runner.clone(), sinfo));
        let users = Arc::new(UsersCollector::new(runner, squeue));

        let mut registry = Registry::new();
        registry.register(nodes.clone());
        registry.register(users.clone());

        Self {
            registry,
            nodes,
            users,
        }
    }
}

/// Build the complete router (metrics + JSON snapshots + health).
pub fn build_router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/nodes", get(handlers::get_nodes))
        .route("/users", get(handlers::get_users))
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::prometheus_metrics).with_state(state))
        .route("/healthz", get(handlers::healthz))
}
