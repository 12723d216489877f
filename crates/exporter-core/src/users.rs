//! Per-user job aggregation over `squeue -o %A|%u|%T|%C|%b` output.

use tracing::{trace, warn};

use crate::classify::{JOB_STATE_PREFIXES, classify, record_lines, split_fields};
use crate::types::{UserJobMetrics, UserJobSnapshot};

/// Fields per squeue record: job id, user, state, cpus, gres.
const JOB_FIELDS: usize = 5;

/// GRES value squeue prints when a job requested no generic resources.
const NO_GRES: &str = "N/A";

/// Aggregate job counts, CPUs and GPUs per user.
///
/// Lines with fewer than five `|`-separated fields, or with an empty user,
/// are skipped with a warning; fields past the fifth are ignored. A well-formed line always creates its
/// user's entry, even when the state is not one we track.
pub fn parse_users(input: &[u8]) -> UserJobSnapshot {
    let text = String::from_utf8_lossy(input);
    let mut users = UserJobSnapshot::new();

    for line in record_lines(&text, '|') {
        let Some(fields) = split_fields(line, '|', JOB_FIELDS) else {
            warn!(%line, "skipping squeue line with too few fields");
            continue;
        };
        let (job_id, user, state, cpus, gres) =
            (fields[0].trim(), fields[1].trim(), fields[2], fields[3], fields[4]);

        if user.is_empty() {
            warn!(%job_id, "skipping squeue line without a user");
            continue;
        }

        let cpus = parse_count(cpus).unwrap_or_else(|| {
            warn!(%job_id, value = %cpus, "invalid cpu count, using 0");
            0.0
        });
        let gpus = parse_gres_gpus(gres);

        let entry = users
            .entry(user.to_string())
            .or_insert_with(UserJobMetrics::default);

        match classify(&JOB_STATE_PREFIXES, &state.trim().to_lowercase()) {
            Some(category) => entry.record(category, cpus, gpus),
            None => trace!(%job_id, %state, "untracked job state"),
        }
    }

    users
}

/// Sum the GPU counts in a squeue GRES string.
///
/// Each comma-separated descriptor containing `gpu:` must look like
/// `gpu:<model>:<count>` to contribute. Other shapes count as zero; an
/// unparseable count is logged and counts as zero.
pub fn parse_gres_gpus(gres: &str) -> f64 {
    let gres = gres.trim();
    if gres == NO_GRES {
        return 0.0;
    }

    let mut gpus = 0.0;
    for descriptor in gres.split(',').filter(|d| d.contains("gpu:")) {
        let parts: Vec<&str> = descriptor.split(':').collect();
        if parts.len() != 3 {
            continue;
        }
        match parse_count(parts[2]) {
            Some(n) => gpus += n,
            None => warn!(%descriptor, "invalid gpu count in gres, using 0"),
        }
    }
    gpus
}

/// Parse a non-negative, finite count.
fn parse_count(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
}
