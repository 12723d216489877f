//! Scrape error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that fail one collector for one scrape.
///
/// None of these are fatal to the process; the registry reports them and
/// moves on to the next collector.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `code` is `None` when the child was killed by a signal.
    #[error("{command} exited with code {code:?}: {stderr}")]
    Exit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{command} did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
