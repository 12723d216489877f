//! exporter-metrics — Slurm collectors and Prometheus exposition.
//!
//! # Architecture
//!
//! ```text
//! Registry::gather()            ← once per scrape
//!   ├── NodesCollector::collect()  → sinfo  → parse_nodes() → slurm_nodes_*
//!   ├── UsersCollector::collect()  → squeue → parse_users() → slurm_user_*
//!   └── slurm_exporter_collector_{success,duration_seconds}
//!
//! render_prometheus() → text/plain for the /metrics endpoint
//! ```
//!
//! Commands run through a [`CommandRunner`]; [`SystemRunner`] spawns real
//! processes with a timeout.

pub mod collector;
pub mod error;
pub mod nodes;
pub mod prometheus;
pub mod registry;
pub mod runner;
pub mod users;

#[cfg(test)]
mod testing;

pub use collector::{Collector, MetricDesc, Observation};
pub use error::{ScrapeError, ScrapeResult};
pub use nodes::NodesCollector;
pub use prometheus::{MetricFamily, render_prometheus};
pub use registry::Registry;
pub use runner::{CommandRunner, CommandSpec, RunFuture, SystemRunner};
pub use users::UsersCollector;
