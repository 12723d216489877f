//! slurm-exporter — Prometheus exporter for Slurm.
//!
//! Every scrape of `/metrics` runs `sinfo` and `squeue`, aggregates their
//! output and renders the result as gauges.
//!
//! # Usage
//!
//! ```text
//! slurm-exporter serve --listen 0.0.0.0:8080 --config /etc/slurm-exporter.toml
//! slurm-exporter collect            # print one scrape to stdout
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use exporter_core::ExporterConfig;
use exporter_metrics::{CommandSpec, SystemRunner};
use tracing::info;

#[derive(Parser)]
#[command(name = "slurm-exporter", about = "Prometheus exporter for Slurm", version)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the scrape endpoint.
    Serve {
        #[command(flatten)]
        opts: Opts,

        /// Address to listen on (overrides `server.listen`).
        #[arg(long)]
        listen: Option<String>,
    },

    /// Run all collectors once and print the exposition to stdout.
    Collect {
        #[command(flatten)]
        opts: Opts,
    },
}

#[derive(Args)]
struct Opts {
    /// TOML config file.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// sinfo binary (overrides `slurm.sinfo`).
    #[arg(long)]
    sinfo: Option<String>,

    /// squeue binary (overrides `slurm.squeue`).
    #[arg(long)]
    squeue: Option<String>,

    /// Per-command timeout, e.g. "10s" (overrides `slurm.timeout`).
    #[arg(long)]
    timeout: Option<String>,
}

impl Opts {
    /// Load the config file (if any) and apply flag overrides.
    fn load(self) -> anyhow::Result<ExporterConfig> {
        let mut config = match &self.config {
            Some(path) => ExporterConfig::from_file(path)?,
            None => ExporterConfig::default(),
        };
        if let Some(sinfo) = self.sinfo {
            config.slurm.sinfo = sinfo;
        }
        if let Some(squeue) = self.squeue {
            config.slurm.squeue = squeue;
        }
        if let Some(timeout) = self.timeout {
            config.slurm.timeout = timeout;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Serve { opts, listen } => {
            let mut config = opts.load()?;
            if let Some(listen) = listen {
                config.server.listen = listen;
            }
            config.validate()?;
            run_server(config).await
        }
        Command::Collect { opts } => {
            let config = opts.load()?;
            config.validate()?;
            let state = api_state(&config)?;
            print!("{}", state.registry.render().await);
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,slurm_exporter=debug,exporter=debug")
    });
    // Logs go to stderr so `collect` output stays clean.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn api_state(config: &ExporterConfig) -> anyhow::Result<exporter_api::ApiState> {
    let runner = Arc::new(SystemRunner::new(config.command_timeout()?));
    Ok(exporter_api::ApiState::new(
        runner,
        CommandSpec::sinfo(config.slurm.sinfo.clone()),
        CommandSpec::squeue(config.slurm.squeue.clone()),
    ))
}

async fn run_server(config: ExporterConfig) -> anyhow::Result<()> {
    let addr = config.listen_addr()?;
    let state = api_state(&config)?;

    info!(
        sinfo = %config.slurm.sinfo,
        squeue = %config.slurm.squeue,
        timeout = %config.slurm.timeout,
        collectors = ?state.registry.collector_names(),
        "slurm exporter starting"
    );

    let router = exporter_api::build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "scrape endpoint listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("slurm exporter stopped");
    Ok(())
}
