//! Shared record helpers for the sinfo/squeue parsers.
//!
//! Classification uses literal prefix tables declared as `const` data, so
//! nothing is built per line and nothing is shared mutably between scrapes.

use crate::types::{JobCategory, NodeCategory};

/// An ordered `(prefix, category)` table. The first matching entry wins.
pub type PrefixTable<C> = [(&'static str, C)];

/// Node state prefixes in classification order.
pub const NODE_STATE_PREFIXES: [(&str, NodeCategory); 10] = [
    ("alloc", NodeCategory::Allocated),
    ("comp", NodeCategory::Completing),
    ("down", NodeCategory::Down),
    ("drain", NodeCategory::Draining),
    ("err", NodeCategory::Error),
    ("fail", NodeCategory::Failed),
    ("idle", NodeCategory::Idle),
    ("maint", NodeCategory::Maintenance),
    ("mix", NodeCategory::Mixed),
    ("resv", NodeCategory::Reserved),
];

/// Job state prefixes in classification order. Matched against the
/// lower-cased state.
pub const JOB_STATE_PREFIXES: [(&str, JobCategory); 3] = [
    ("pending", JobCategory::Pending),
    ("running", JobCategory::Running),
    ("suspended", JobCategory::Suspended),
];

/// Return the category of the first table entry whose prefix starts `value`.
pub fn classify<C: Copy>(table: &PrefixTable<C>, value: &str) -> Option<C> {
    table
        .iter()
        .find(|(prefix, _)| value.starts_with(*prefix))
        .map(|(_, category)| *category)
}

/// Split `line` on `sep` and return its first `n` fields.
///
/// Fields past the `n`th are dropped. Returns `None` when the line has
/// fewer than `n` fields.
pub fn split_fields(line: &str, sep: char, n: usize) -> Option<Vec<&str>> {
    let fields: Vec<&str> = line.split(sep).take(n).collect();
    (fields.len() == n).then_some(fields)
}

/// Iterate the lines of command output that contain `sep`.
pub fn record_lines(input: &str, sep: char) -> impl Iterator<Item = &str> {
    input.lines().filter(move |line| line.contains(sep))
}
