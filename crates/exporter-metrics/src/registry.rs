//! Collector registry.
//!
//! Runs every registered collector once per scrape. A failing collector
//! contributes no samples and is reported through
//! `slurm_exporter_collector_success`; the other collectors are unaffected.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::collector::{Collector, MetricDesc};
use crate::prometheus::{MetricFamily, render_prometheus};

pub static COLLECTOR_SUCCESS: MetricDesc = MetricDesc::labelled(
    "slurm_exporter_collector_success",
    "Whether the collector succeeded on this scrape",
    "collector",
);

pub static COLLECTOR_DURATION: MetricDesc = MetricDesc::labelled(
    "slurm_exporter_collector_duration_seconds",
    "Time the collector took on this scrape",
    "collector",
);

#[derive(Clone, Default)]
pub struct Registry {
    collectors: Vec<Arc<dyn Collector>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, collector: Arc<dyn Collector>) {
        debug!(collector = collector.name(), "collector registered");
        self.collectors.push(collector);
    }

    pub fn collector_names(&self) -> Vec<&'static str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Run all collectors and group their samples by family.
    pub async fn gather(&self) -> Vec<MetricFamily> {
        let mut families = Vec::new();
        let mut success = MetricFamily {
            desc: &COLLECTOR_SUCCESS,
            samples: Vec::new(),
        };
        let mut duration = MetricFamily {
            desc: &COLLECTOR_DURATION,
            samples: Vec::new(),
        };

        for collector in &self.collectors {
            let name = collector.name();
            let start = Instant::now();
            let mut owned: Vec<MetricFamily> = collector
                .describe()
                .iter()
                .map(|desc| MetricFamily {
                    desc,
                    samples: Vec::new(),
                })
                .collect();

            let ok = match collector.collect().await {
                Ok(observations) => {
                    for obs in observations {
                        match owned.iter_mut().find(|f| f.desc.name == obs.desc.name) {
                            Some(family) => family.samples.push(obs),
                            None => warn!(
                                collector = name,
                                metric = obs.desc.name,
                                "dropping undescribed metric"
                            ),
                        }
                    }
                    true
                }
                Err(e) => {
                    warn!(collector = name, error = %e, "collector scrape failed");
                    false
                }
            };

            let elapsed = start.elapsed().as_secs_f64();
            debug!(collector = name, ok, elapsed, "collector finished");

            success
                .samples
                .push(COLLECTOR_SUCCESS.gauge_with(name, if ok { 1.0 } else { 0.0 }));
            duration.samples.push(COLLECTOR_DURATION.gauge_with(name, elapsed));
            families.extend(owned);
        }

        families.push(success);
        families.push(duration);
        families
    }

    /// Gather and render in Prometheus text format.
    pub async fn render(&self) -> String {
        render_prometheus(&self.gather().await)
    }
}
