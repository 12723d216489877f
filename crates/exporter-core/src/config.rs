//! exporter.toml configuration parser.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    pub server: ServerConfig,
    pub slurm: SlurmConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the scrape endpoint binds to.
    pub listen: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlurmConfig {
    /// Path or name of the `sinfo` binary.
    pub sinfo: String,
    /// Path or name of the `squeue` binary.
    pub squeue: String,
    /// Upper bound for one command invocation, e.g. "10s" or "500ms".
    pub timeout: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Default for SlurmConfig {
    fn default() -> Self {
        Self {
            sinfo: "sinfo".to_string(),
            squeue: "squeue".to_string(),
            timeout: "10s".to_string(),
        }
    }
}

impl ExporterConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config: ExporterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields that are only parsed lazily.
    pub fn validate(&self) -> ConfigResult<()> {
        self.listen_addr()?;
        self.command_timeout()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> ConfigResult<SocketAddr> {
        self.server
            .listen
            .parse()
            .map_err(|_| ConfigError::Listen(self.server.listen.clone()))
    }

    pub fn command_timeout(&self) -> ConfigResult<Duration> {
        parse_duration(&self.slurm.timeout)
            .filter(|d| !d.is_zero())
            .ok_or_else(|| ConfigError::Duration(self.slurm.timeout.clone()))
    }
}

/// Parse "500ms", "10s", "2m" or a bare number of seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
