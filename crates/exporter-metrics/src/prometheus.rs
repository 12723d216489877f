//! Prometheus text exposition format.
//!
//! Renders gathered metric families into the text format served on
//! `/metrics`.

use std::fmt::Write;

use crate::collector::{MetricDesc, Observation};

/// A family description together with the samples gathered for it.
#[derive(Debug, Clone)]
pub struct MetricFamily {
    pub desc: &'static MetricDesc,
    pub samples: Vec<Observation>,
}

/// Render families into Prometheus text format.
///
/// Every family gets its HELP and TYPE lines, even without samples.
pub fn render_prometheus(families: &[MetricFamily]) -> String {
    let mut out = String::new();

    for family in families {
        let desc = family.desc;
        let _ = writeln!(out, "# HELP {} {}", desc.name, escape_help(desc.help));
        let _ = writeln!(out, "# TYPE {} gauge", desc.name);

        for sample in &family.samples {
            match (desc.label, &sample.label_value) {
                (Some(label), Some(value)) => {
                    let _ = writeln!(
                        out,
                        "{}{{{}=\"{}\"}} {}",
                        desc.name,
                        label,
                        escape_label(value),
                        sample.value
                    );
                }
                _ => {
                    let _ = writeln!(out, "{} {}", desc.name, sample.value);
                }
            }
        }
    }

    out
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
