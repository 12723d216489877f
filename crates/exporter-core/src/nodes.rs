//! Node-state aggregation over `sinfo -h -o %n,%T` output.

use tracing::trace;

use crate::classify::{NODE_STATE_PREFIXES, classify, record_lines};
use crate::types::NodeStateSnapshot;

/// Count nodes per state category.
///
/// Each line carrying a comma contributes its second field as the node
/// state. States are matched by prefix, so suffixes like `*` (not
/// responding) or `~` (powered down) do not matter. Lines without a comma
/// and unknown states are skipped.
pub fn parse_nodes(input: &[u8]) -> NodeStateSnapshot {
    let text = String::from_utf8_lossy(input);
    let mut snapshot = NodeStateSnapshot::default();

    for line in record_lines(&text, ',') {
        let Some(state) = line.split(',').nth(1) else {
            continue;
        };
        match classify(&NODE_STATE_PREFIXES, state.trim()) {
            Some(category) => snapshot.increment(category),
            None => trace!(%line, "unrecognised node state"),
        }
    }

    snapshot
}
