//! Snapshot types produced by the sinfo/squeue parsers.
//!
//! Snapshots are built fresh for every scrape and never mutated after the
//! parser returns them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of a Slurm user as printed by `squeue -o %u`.
pub type UserId = String;

// ── Nodes ──────────────────────────────────────────────────────────

/// Node state categories, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Allocated,
    Completing,
    Down,
    Draining,
    Error,
    Failed,
    Idle,
    Maintenance,
    Mixed,
    Reserved,
}

impl NodeCategory {
    /// All categories in declaration order.
    pub const ALL: [NodeCategory; 10] = [
        NodeCategory::Allocated,
        NodeCategory::Completing,
        NodeCategory::Down,
        NodeCategory::Draining,
        NodeCategory::Error,
        NodeCategory::Failed,
        NodeCategory::Idle,
        NodeCategory::Maintenance,
        NodeCategory::Mixed,
        NodeCategory::Reserved,
    ];

    /// The state prefix that selects this category (`alloc`, `comp`, ...).
    ///
    /// Doubles as the metric suffix: `slurm_nodes_<prefix>`.
    pub fn prefix(self) -> &'static str {
        match self {
            NodeCategory::Allocated => "alloc",
            NodeCategory::Completing => "comp",
            NodeCategory::Down => "down",
            NodeCategory::Draining => "drain",
            NodeCategory::Error => "err",
            NodeCategory::Failed => "fail",
            NodeCategory::Idle => "idle",
            NodeCategory::Maintenance => "maint",
            NodeCategory::Mixed => "mix",
            NodeCategory::Reserved => "resv",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Node counts per state category. All ten categories are always present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStateSnapshot {
    counts: [f64; 10],
}

impl NodeStateSnapshot {
    /// Count for one category.
    pub fn get(&self, category: NodeCategory) -> f64 {
        self.counts[category.index()]
    }

    /// Sum over all categories.
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Iterate `(category, count)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeCategory, f64)> + '_ {
        NodeCategory::ALL.iter().map(|c| (*c, self.get(*c)))
    }

    pub(crate) fn increment(&mut self, category: NodeCategory) {
        self.counts[category.index()] += 1.0;
    }
}

impl Serialize for NodeStateSnapshot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<NodeCategory, f64> = self.iter().collect();
        map.serialize(serializer)
    }
}

// ── Jobs ───────────────────────────────────────────────────────────

/// Job state categories tracked per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    Pending,
    Running,
    Suspended,
}

/// Per-user job aggregates. All fields are non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserJobMetrics {
    pub pending_count: f64,
    pub pending_cpu_total: f64,
    pub pending_gpu_total: f64,
    pub running_count: f64,
    pub running_cpu_total: f64,
    pub running_gpu_total: f64,
    pub suspended_count: f64,
}

impl UserJobMetrics {
    /// Account one job line. Suspended jobs only bump their counter.
    pub fn record(&mut self, category: JobCategory, cpus: f64, gpus: f64) {
        match category {
            JobCategory::Pending => {
                self.pending_count += 1.0;
                self.pending_cpu_total += cpus;
                self.pending_gpu_total += gpus;
            }
            JobCategory::Running => {
                self.running_count += 1.0;
                self.running_cpu_total += cpus;
                self.running_gpu_total += gpus;
            }
            JobCategory::Suspended => {
                self.suspended_count += 1.0;
            }
        }
    }

    /// Total number of jobs in a recognised state.
    pub fn job_count(&self) -> f64 {
        self.pending_count + self.running_count + self.suspended_count
    }
}

/// Job aggregates keyed by user, ordered by user name.
pub type UserJobSnapshot = BTreeMap<UserId, UserJobMetrics>;
