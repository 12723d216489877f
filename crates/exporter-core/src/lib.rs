//! exporter-core — the text-to-metrics aggregation pipeline.
//!
//! Turns raw `sinfo` / `squeue` output into immutable snapshots. Every
//! parser here is a pure function of its input bytes; nothing is shared
//! between calls.
//!
//! ```text
//! sinfo  -h -o %n,%T           → parse_nodes() → NodeStateSnapshot
//! squeue -a -r -h -o %A|%u|%T|%C|%b → parse_users() → UserJobSnapshot
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod nodes;
pub mod types;
pub mod users;

pub use config::ExporterConfig;
pub use error::{ConfigError, ConfigResult};
pub use nodes::parse_nodes;
pub use types::*;
pub use users::{parse_gres_gpus, parse_users};
