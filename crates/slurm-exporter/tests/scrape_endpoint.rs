//! Scrape endpoint regression tests.
//!
//! Drives the full router with scripted `sinfo` / `squeue` output and checks
//! the exposition a Prometheus server would receive.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use exporter_api::{ApiState, build_router};
use exporter_metrics::{CommandRunner, CommandSpec, RunFuture, ScrapeError};
use tower::ServiceExt;

const SINFO: &str = "node001,idle\n\
                     node002,allocated\n\
                     node002,allocated\n\
                     node003,mixed\n\
                     node004,drained*\n\
                     node005,down~\n";

const SQUEUE: &str = "101|alice|RUNNING|4|gpu:a100:2\n\
                      102|alice|PENDING|8|N/A\n\
                      103|bob|SUSPENDED|2|N/A\n\
                      104|carol|COMPLETING|1|N/A\n\
                      105|broken\n";

/// Serves the next queued output per program; an empty queue fails.
#[derive(Default)]
struct QueueRunner {
    outputs: Mutex<HashMap<String, Vec<String>>>,
}

impl QueueRunner {
    fn push(self, program: &str, stdout: &str) -> Self {
        self.outputs
            .lock()
            .unwrap()
            .entry(program.to_string())
            .or_default()
            .push(stdout.to_string());
        self
    }
}

impl CommandRunner for QueueRunner {
    fn run<'a>(&'a self, program: &'a str, _args: &'a [String]) -> RunFuture<'a> {
        let next = self
            .outputs
            .lock()
            .unwrap()
            .get_mut(program)
            .filter(|q| !q.is_empty())
            .map(|q| q.remove(0));
        let result = next.map(String::into_bytes).ok_or_else(|| ScrapeError::Exit {
            command: program.to_string(),
            code: Some(1),
            stderr: "slurm_load_jobs error: Unable to contact slurm controller".to_string(),
        });
        Box::pin(async move { result })
    }
}

fn router(runner: QueueRunner) -> axum::Router {
    build_router(ApiState::new(
        Arc::new(runner),
        CommandSpec::sinfo("sinfo"),
        CommandSpec::squeue("squeue"),
    ))
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn sample(body: &str, series: &str) -> Option<f64> {
    body.lines()
        .find_map(|line| line.strip_prefix(series)?.strip_prefix(' '))
        .map(|v| v.parse().unwrap())
}

#[tokio::test]
async fn metrics_scrape_reports_nodes_and_users() {
    let runner = QueueRunner::default().push("sinfo", SINFO).push("squeue", SQUEUE);
    let (status, body) = get(router(runner), "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    // Nodes: duplicates from multiple partitions count once.
    assert_eq!(sample(&body, "slurm_nodes_idle"), Some(1.0));
    assert_eq!(sample(&body, "slurm_nodes_alloc"), Some(1.0));
    assert_eq!(sample(&body, "slurm_nodes_mix"), Some(1.0));
    assert_eq!(sample(&body, "slurm_nodes_drain"), Some(1.0));
    assert_eq!(sample(&body, "slurm_nodes_down"), Some(1.0));
    assert_eq!(sample(&body, "slurm_nodes_resv"), Some(0.0));

    // Users: only positive fields are exported.
    assert_eq!(sample(&body, "slurm_user_jobs_running{user=\"alice\"}"), Some(1.0));
    assert_eq!(sample(&body, "slurm_user_cpus_running{user=\"alice\"}"), Some(4.0));
    assert_eq!(sample(&body, "slurm_user_gpus_running{user=\"alice\"}"), Some(2.0));
    assert_eq!(sample(&body, "slurm_user_jobs_pending{user=\"alice\"}"), Some(1.0));
    assert_eq!(sample(&body, "slurm_user_cpus_pending{user=\"alice\"}"), Some(8.0));
    assert_eq!(sample(&body, "slurm_user_gpus_pending{user=\"alice\"}"), None);
    assert_eq!(sample(&body, "slurm_user_jobs_suspended{user=\"bob\"}"), Some(1.0));
    assert_eq!(sample(&body, "slurm_user_cpus_running{user=\"bob\"}"), None);
    assert!(!body.contains("user=\"carol\""));
    assert!(!body.contains("user=\"broken\""));

    assert_eq!(
        sample(&body, "slurm_exporter_collector_success{collector=\"nodes\"}"),
        Some(1.0)
    );
    assert_eq!(
        sample(&body, "slurm_exporter_collector_success{collector=\"users\"}"),
        Some(1.0)
    );
}

#[tokio::test]
async fn each_scrape_runs_commands_again() {
    let runner = QueueRunner::default()
        .push("sinfo", "n1,idle\n")
        .push("sinfo", "n1,alloc\n")
        .push("squeue", "")
        .push("squeue", "");
    let router = router(runner);

    let (_, first) = get(router.clone(), "/metrics").await;
    let (_, second) = get(router, "/metrics").await;

    assert_eq!(sample(&first, "slurm_nodes_idle"), Some(1.0));
    assert_eq!(sample(&second, "slurm_nodes_idle"), Some(0.0));
    assert_eq!(sample(&second, "slurm_nodes_alloc"), Some(1.0));
}

#[tokio::test]
async fn failed_command_keeps_endpoint_up() {
    let runner = QueueRunner::default().push("sinfo", "n1,idle\n");
    let (status, body) = get(router(runner), "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(sample(&body, "slurm_nodes_idle"), Some(1.0));
    assert_eq!(
        sample(&body, "slurm_exporter_collector_success{collector=\"users\"}"),
        Some(0.0)
    );
    assert!(body.contains("# TYPE slurm_user_jobs_running gauge"));
}

#[tokio::test]
async fn users_snapshot_endpoint() {
    let runner = QueueRunner::default().push("squeue", SQUEUE);
    let (status, body) = get(router(runner), "/api/v1/users").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["data"]["alice"]["running_cpu_total"], 4.0);
    assert_eq!(json["data"]["bob"]["suspended_count"], 1.0);
    assert_eq!(json["data"]["carol"]["running_count"], 0.0);
    assert!(json["data"].get("broken").is_none());
}

#[tokio::test]
async fn nodes_snapshot_endpoint_reports_failure() {
    let (status, body) = get(router(QueueRunner::default()), "/api/v1/nodes").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn healthz_is_ok() {
    let (status, body) = get(router(QueueRunner::default()), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
