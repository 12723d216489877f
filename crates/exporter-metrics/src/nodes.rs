//! Node-state collector: `sinfo` → `slurm_nodes_*` gauges.

use std::collections::BTreeSet;
use std::sync::Arc;

use exporter_core::{NodeCategory, NodeStateSnapshot, parse_nodes};
use tracing::debug;

use crate::collector::{CollectFuture, Collector, MetricDesc, Observation};
use crate::error::ScrapeResult;
use crate::runner::{CommandRunner, CommandSpec};

/// One family per [`NodeCategory`], in the same order.
pub static NODE_METRICS: [MetricDesc; 10] = [
    MetricDesc::new("slurm_nodes_alloc", "Allocated nodes"),
    MetricDesc::new("slurm_nodes_comp", "Completing nodes"),
    MetricDesc::new("slurm_nodes_down", "Down nodes"),
    MetricDesc::new("slurm_nodes_drain", "Drain nodes"),
    MetricDesc::new("slurm_nodes_err", "Error nodes"),
    MetricDesc::new("slurm_nodes_fail", "Fail nodes"),
    MetricDesc::new("slurm_nodes_idle", "Idle nodes"),
    MetricDesc::new("slurm_nodes_maint", "Maint nodes"),
    MetricDesc::new("slurm_nodes_mix", "Mix nodes"),
    MetricDesc::new("slurm_nodes_resv", "Reserved nodes"),
];

pub struct NodesCollector {
    runner: Arc<dyn CommandRunner>,
    command: CommandSpec,
}

impl NodesCollector {
    pub fn new(runner: Arc<dyn CommandRunner>, command: CommandSpec) -> Self {
        Self { runner, command }
    }

    /// Run `sinfo` and count nodes per state.
    pub async fn snapshot(&self) -> ScrapeResult<NodeStateSnapshot> {
        let raw = self.command.run(self.runner.as_ref()).await?;
        let snapshot = parse_nodes(&unique_lines(&raw));
        debug!(nodes = snapshot.total(), "node states collected");
        Ok(snapshot)
    }

    /// Every category is emitted, zero or not.
    pub fn observations(snapshot: &NodeStateSnapshot) -> Vec<Observation> {
        NodeCategory::ALL
            .iter()
            .zip(NODE_METRICS.iter())
            .map(|(category, desc)| desc.gauge(snapshot.get(*category)))
            .collect()
    }
}

impl Collector for NodesCollector {
    fn name(&self) -> &'static str {
        "nodes"
    }

    fn describe(&self) -> &'static [MetricDesc] {
        &NODE_METRICS
    }

    fn collect(&self) -> CollectFuture<'_> {
        Box::pin(async move {
            let snapshot = self.snapshot().await?;
            Ok(Self::observations(&snapshot))
        })
    }
}

/// Sort and de-duplicate output lines.
///
/// `sinfo` lists a node once per partition it belongs to; each node must be
/// counted once.
fn unique_lines(raw: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(raw);
    let lines: BTreeSet<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut out = Vec::with_capacity(raw.len());
    for line in lines {
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;

    fn collector(runner: ScriptedRunner) -> NodesCollector {
        NodesCollector::new(Arc::new(runner), CommandSpec::sinfo("sinfo"))
    }

    #[test]
    fn metric_names_follow_category_prefixes() {
        for (category, desc) in NodeCategory::ALL.iter().zip(NODE_METRICS.iter()) {
            assert_eq!(desc.name, format!("slurm_nodes_{}", category.prefix()));
            assert!(desc.label.is_none());
        }
    }

    #[test]
    fn unique_lines_drops_partition_duplicates() {
        let out = unique_lines(b"n2,idle\nn1,alloc\nn2,idle\n\n");
        assert_eq!(out, b"n1,alloc\nn2,idle\n");
    }

    #[tokio::test]
    async fn emits_all_categories_including_zero() {
        let c = collector(ScriptedRunner::ok("sinfo", "node1,idle\nnode2,alloc*\nnode3,mixed\n"));
        let obs = c.collect().await.unwrap();

        assert_eq!(obs.len(), 10);
        let value = |name: &str| obs.iter().find(|o| o.desc.name == name).unwrap().value;
        assert_eq!(value("slurm_nodes_idle"), 1.0);
        assert_eq!(value("slurm_nodes_alloc"), 1.0);
        assert_eq!(value("slurm_nodes_mix"), 1.0);
        assert_eq!(value("slurm_nodes_down"), 0.0);
        assert_eq!(value("slurm_nodes_resv"), 0.0);
    }

    #[tokio::test]
    async fn node_in_two_partitions_counts_once() {
        let c = collector(ScriptedRunner::ok("sinfo", "n1,idle\nn1,idle\nn2,down\n"));
        let snap = c.snapshot().await.unwrap();
        assert_eq!(snap.get(NodeCategory::Idle), 1.0);
        assert_eq!(snap.total(), 2.0);
    }

    #[tokio::test]
    async fn command_failure_is_returned() {
        let c = collector(ScriptedRunner::failing("sinfo"));
        assert!(c.collect().await.is_err());
    }

    #[tokio::test]
    async fn passes_configured_arguments() {
        let runner = ScriptedRunner::ok("sinfo", "");
        let calls = runner.calls();
        collector(runner).snapshot().await.unwrap();
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            &[vec!["sinfo".to_string(), "-h".into(), "-o".into(), "%n,%T".into()]]
        );
    }
}
