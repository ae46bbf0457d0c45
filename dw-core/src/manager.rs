//! Scan orchestration and job lifecycle
//!
//! The [`ScanManager`] is the sole entry point exposed to collaborators. It
//! owns the job table and the baseline store, generates job identity, and
//! runs each scan in a background tokio task so callers get a job id
//! immediately instead of waiting on traversal latency.
//!
//! Jobs move `running -> completed` or `running -> failed` and are terminal
//! after that; a failed job is resolved by issuing a new scan. Every failure
//! escaping snapshot/diff/aggregate - including a panicked traversal worker -
//! is caught here and recorded into the job record, never propagated.
//!
//! Scans for the same host are serialized with a per-host async lock so a
//! baseline-creation race cannot install two different "first" baselines;
//! scans for different hosts run in parallel.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, info};

use dw_error::{DriftwatchError, Result};
use dw_protocol::{
    BaselineSummary, ChangeRecord, JobStatus, Request, Response, ResponseData, ScanAck,
    ScanReport, ScanSummary, Severity,
};

use crate::baseline::BaselineStore;
use crate::constants::scan::default_scan_roots;
use crate::diff::{diff_snapshots, missing_root_change};
use crate::ident;
use crate::jobs::JobTable;
use crate::severity::aggregate;
use crate::snapshot::capture_snapshot;

/// Baseline handling for one scan execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaselineMode {
    /// Create the baseline if absent, otherwise diff against it
    CreateOrDiff,
    /// Install the fresh snapshot as the new baseline unconditionally
    Replace,
}

/// Orchestrates scans end-to-end and owns all mutable engine state
#[derive(Default)]
pub struct ScanManager {
    jobs: Arc<JobTable>,
    baselines: Arc<BaselineStore>,
    host_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ScanManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an integrity scan. Returns immediately with the job id; results
    /// become visible via [`ScanManager::get_results`] once the job is terminal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_scan(&self, host_id: &str, scan_paths: Option<Vec<String>>) -> Result<ScanAck> {
        self.launch(host_id, scan_paths, BaselineMode::CreateOrDiff)
    }

    /// Convenience alias that triggers a scan over the default roots. An
    /// existing baseline is left untouched and the scan diffs against it.
    pub fn create_baseline(&self, host_id: &str) -> Result<ScanAck> {
        self.launch(host_id, None, BaselineMode::CreateOrDiff)
    }

    /// Explicit re-baseline: scans and unconditionally installs the fresh
    /// snapshot as the host's new reference.
    pub fn replace_baseline(&self, host_id: &str, scan_paths: Option<Vec<String>>) -> Result<ScanAck> {
        self.launch(host_id, scan_paths, BaselineMode::Replace)
    }

    pub fn get_results(&self, job_id: &str) -> Result<ScanReport> {
        self.jobs
            .get(job_id)
            .ok_or_else(|| DriftwatchError::JobNotFound(job_id.to_string()))
    }

    pub fn get_baseline(&self, host_id: &str) -> Result<BaselineSummary> {
        self.baselines
            .summary(host_id)
            .ok_or_else(|| DriftwatchError::BaselineNotFound(host_id.to_string()))
    }

    /// Scan summaries, optionally filtered by host, newest first
    pub fn list_scans(&self, host_id: Option<&str>) -> Vec<ScanSummary> {
        self.jobs.list(host_id)
    }

    pub fn baseline_count(&self) -> usize {
        self.baselines.len()
    }

    pub fn running_scans(&self) -> usize {
        self.jobs.running_count()
    }

    /// Dispatch one protocol request. This is the seam the (out-of-scope)
    /// request dispatcher calls; it validates the request and maps engine
    /// errors onto the structured response variants.
    pub fn handle(&self, request: &Request) -> Response {
        if let Err(reason) = request.validate() {
            return Response::error(reason);
        }

        let result = match request {
            Request::StartScan { host_id, scan_paths } => self
                .start_scan(host_id, scan_paths.clone())
                .map(ResponseData::ack),
            Request::CreateBaseline { host_id } => {
                self.create_baseline(host_id).map(ResponseData::ack)
            }
            Request::ReplaceBaseline { host_id, scan_paths } => self
                .replace_baseline(host_id, scan_paths.clone())
                .map(ResponseData::ack),
            Request::GetResults { job_id } => self.get_results(job_id).map(ResponseData::report),
            Request::GetBaseline { host_id } => {
                self.get_baseline(host_id).map(ResponseData::baseline)
            }
            Request::ListScans { host_id } => {
                Ok(ResponseData::scan_list(self.list_scans(host_id.as_deref())))
            }
        };

        match result {
            Ok(data) => Response::Ok(data),
            Err(e) if e.is_not_found() => Response::not_found(e.to_string()),
            Err(e) => Response::error(e.to_string()),
        }
    }

    fn launch(
        &self,
        host_id: &str,
        scan_paths: Option<Vec<String>>,
        mode: BaselineMode,
    ) -> Result<ScanAck> {
        if host_id.is_empty() {
            return Err(DriftwatchError::invalid_host_id(host_id, "must not be empty"));
        }

        let roots = scan_paths.unwrap_or_else(default_scan_roots);
        let job_id = ident::generate_job_id();

        let report = ScanReport {
            job_id: job_id.clone(),
            host_id: host_id.to_string(),
            status: JobStatus::Running,
            started_at: ident::utc_now(),
            completed_at: None,
            scan_paths: roots,
            files_scanned: 0,
            changes: Vec::new(),
            baseline_score: 100,
            severity: Severity::Low,
            error: None,
        };
        self.jobs.insert(report.clone());

        info!(
            job = %job_id,
            host = %host_id,
            roots = report.scan_paths.len(),
            "Scan initiated"
        );

        let jobs = Arc::clone(&self.jobs);
        let baselines = Arc::clone(&self.baselines);
        let lock = self.host_lock(host_id);

        tokio::spawn(async move {
            let _guard = lock.lock().await;

            let terminal = match execute_scan(&baselines, report.clone(), mode).await {
                Ok(terminal) => terminal,
                Err(e) => {
                    error!(job = %report.job_id, error = %e, "Scan failed");
                    failed_report(report, e)
                }
            };

            jobs.finalize(terminal);
        });

        Ok(ScanAck {
            job_id,
            status: JobStatus::Running,
            message: format!("Scan initiated for {}", host_id),
        })
    }

    fn host_lock(&self, host_id: &str) -> Arc<AsyncMutex<()>> {
        self.host_locks
            .lock()
            .entry(host_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

/// Run the snapshot/diff/aggregate pipeline for one job and build its
/// terminal record. Traversal and hashing run on the blocking pool so file
/// I/O never stalls unrelated scans on the async workers.
async fn execute_scan(
    baselines: &BaselineStore,
    mut report: ScanReport,
    mode: BaselineMode,
) -> Result<ScanReport> {
    let roots = report.scan_paths.clone();
    let outcome = tokio::task::spawn_blocking(move || capture_snapshot(&roots))
        .await
        .map_err(|e| DriftwatchError::ScanWorker(e.to_string()))?;

    let files_scanned = outcome.files_scanned();
    let mut changes: Vec<ChangeRecord> = outcome
        .missing_roots
        .iter()
        .map(|root| missing_root_change(root))
        .collect();

    match mode {
        BaselineMode::Replace => {
            baselines.replace(&report.host_id, outcome.snapshot);
        }
        BaselineMode::CreateOrDiff => match baselines.snapshot_for(&report.host_id) {
            Some(reference) => changes.extend(diff_snapshots(&reference, &outcome.snapshot)),
            None => {
                baselines.create(&report.host_id, outcome.snapshot);
            }
        },
    }

    let (baseline_score, severity) = aggregate(&changes);
    let completed_at = ident::utc_now();
    baselines.record_scan(&report.host_id, &completed_at);

    report.status = JobStatus::Completed;
    report.completed_at = Some(completed_at);
    report.files_scanned = files_scanned;
    report.changes = changes;
    report.baseline_score = baseline_score;
    report.severity = severity;

    info!(
        job = %report.job_id,
        host = %report.host_id,
        files = report.files_scanned,
        changes = report.changes.len(),
        score = report.baseline_score,
        "Scan completed"
    );

    Ok(report)
}

fn failed_report(mut report: ScanReport, err: DriftwatchError) -> ScanReport {
    report.status = JobStatus::Failed;
    report.completed_at = Some(ident::utc_now());
    report.error = Some(err.to_string());
    report
}
