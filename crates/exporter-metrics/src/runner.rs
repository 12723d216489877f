//! External command execution.
//!
//! Collectors never spawn processes directly; they go through a
//! [`CommandRunner`] so tests can script the Slurm tools' output.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{ScrapeError, ScrapeResult};

/// Boxed future alias for command runner results.
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = ScrapeResult<Vec<u8>>> + Send + 'a>>;

/// Runs a command to completion and returns its standard output.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(&'a self, program: &'a str, args: &'a [String]) -> RunFuture<'a>;
}

/// Runs commands as child processes with a bounded wait.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn run_inner(&self, program: &str, args: &[String]) -> ScrapeResult<Vec<u8>> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(program, ?args, "running command");

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|source| ScrapeError::Launch {
                command: program.to_string(),
                source,
            })?,
            // Dropping the output future kills the child.
            Err(_) => {
                return Err(ScrapeError::Timeout {
                    command: program.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        if !output.status.success() {
            return Err(ScrapeError::Exit {
                command: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl CommandRunner for SystemRunner {
    fn run<'a>(&'a self, program: &'a str, args: &'a [String]) -> RunFuture<'a> {
        Box::pin(self.run_inner(program, args))
    }
}

/// A program plus its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `sinfo -h -o %n,%T`: one `hostname,state` line per node and partition.
    pub fn sinfo(program: impl Into<String>) -> Self {
        Self::new(program, &["-h", "-o", "%n,%T"])
    }

    /// `squeue -a -r -h -o %A|%u|%T|%C|%b`: one line per job (array tasks
    /// expanded) with id, user, state, cpus and gres.
    pub fn squeue(program: impl Into<String>) -> Self {
        Self::new(program, &["-a", "-r", "-h", "-o", "%A|%u|%T|%C|%b"])
    }

    pub async fn run(&self, runner: &dyn CommandRunner) -> ScrapeResult<Vec<u8>> {
        runner.run(&self.program, &self.args).await
    }
}
