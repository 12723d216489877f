//! User-job collector: `squeue` → `slurm_user_*` gauges labelled by user.

use std::sync::Arc;

use exporter_core::{UserJobMetrics, UserJobSnapshot, parse_users};
use tracing::debug;

use crate::collector::{CollectFuture, Collector, MetricDesc, Observation};
use crate::error::ScrapeResult;
use crate::runner::{CommandRunner, CommandSpec};

pub static USER_METRICS: [MetricDesc; 7] = [
    MetricDesc::labelled("slurm_user_jobs_pending", "Pending jobs for user", "user"),
    MetricDesc::labelled("slurm_user_cpus_pending", "Pending jobs for user", "user"),
    MetricDesc::labelled("slurm_user_gpus_pending", "Pending gpus for user", "user"),
    MetricDesc::labelled("slurm_user_jobs_running", "Running jobs for user", "user"),
    MetricDesc::labelled("slurm_user_cpus_running", "Running cpus for user", "user"),
    MetricDesc::labelled("slurm_user_gpus_running", "Running gpus for user", "user"),
    MetricDesc::labelled("slurm_user_jobs_suspended", "Suspended jobs for user", "user"),
];

pub struct UsersCollector {
    runner: Arc<dyn CommandRunner>,
    command: CommandSpec,
}

impl UsersCollector {
    pub fn new(runner: Arc<dyn CommandRunner>, command: CommandSpec) -> Self {
        Self { runner, command }
    }

    /// Run `squeue` and aggregate jobs per user.
    pub async fn snapshot(&self) -> ScrapeResult<UserJobSnapshot> {
        let raw = self.command.run(self.runner.as_ref()).await?;
        let users = parse_users(&raw);
        debug!(users = users.len(), "user jobs collected");
        Ok(users)
    }

    /// Emit only the fields that are strictly positive.
    pub fn observations(users: &UserJobSnapshot) -> Vec<Observation> {
        let mut out = Vec::new();
        for (user, metrics) in users {
            for (desc, value) in USER_METRICS.iter().zip(fields(metrics)) {
                if value > 0.0 {
                    out.push(desc.gauge_with(user, value));
                }
            }
        }
        out
    }
}

/// Field values in [`USER_METRICS`] order.
fn fields(m: &UserJobMetrics) -> [f64; 7] {
    [
        m.pending_count,
        m.pending_cpu_total,
        m.pending_gpu_total,
        m.running_count,
        m.running_cpu_total,
        m.running_gpu_total,
        m.suspended_count,
    ]
}

impl Collector for UsersCollector {
    fn name(&self) -> &'static str {
        "users"
    }

    fn describe(&self) -> &'static [MetricDesc] {
        &USER_METRICS
    }

    fn collect(&self) -> CollectFuture<'_> {
        Box::pin(async move {
            let users = self.snapshot().await?;
            Ok(Self::observations(&users))
        })
    }
}
