//! The collector abstraction.
//!
//! A collector describes the metric families it owns and, on each scrape,
//! produces zero or more observations for them.

use std::future::Future;
use std::pin::Pin;

use crate::error::ScrapeResult;

/// Boxed future alias for collector results.
pub type CollectFuture<'a> =
    Pin<Box<dyn Future<Output = ScrapeResult<Vec<Observation>>> + Send + 'a>>;

/// Static description of one gauge family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    /// Label name, if the family is labelled.
    pub label: Option<&'static str>,
}

impl MetricDesc {
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            label: None,
        }
    }

    pub const fn labelled(name: &'static str, help: &'static str, label: &'static str) -> Self {
        Self {
            name,
            help,
            label: Some(label),
        }
    }

    /// Observation of this family without a label value.
    pub fn gauge(&'static self, value: f64) -> Observation {
        Observation {
            desc: self,
            value,
            label_value: None,
        }
    }

    /// Observation of this family for one label value.
    pub fn gauge_with(&'static self, label_value: &str, value: f64) -> Observation {
        Observation {
            desc: self,
            value,
            label_value: Some(label_value.to_string()),
        }
    }
}

/// One sample produced during a scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub desc: &'static MetricDesc,
    pub value: f64,
    pub label_value: Option<String>,
}

/// Source of metrics that is queried on every scrape.
pub trait Collector: Send + Sync {
    /// Short name used in logs and self-metrics (`nodes`, `users`).
    fn name(&self) -> &'static str;

    /// The families this collector may emit, in exposition order.
    fn describe(&self) -> &'static [MetricDesc];

    /// Fetch, parse and emit the current observations.
    fn collect(&self) -> CollectFuture<'_>;
}
