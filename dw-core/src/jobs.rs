//! Scan job records
//!
//! In-memory table of every scan job issued during the process lifetime.
//! A record is inserted once in the `running` state and replaced exactly
//! once with its terminal form, so concurrent readers see either the
//! running record or the complete terminal record - never a partial one.

use parking_lot::RwLock;
use std::collections::HashMap;

use dw_protocol::{JobStatus, ScanReport, ScanSummary};

/// Keyed store of scan job records
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: RwLock<HashMap<String, ScanReport>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the initial running record for a new job
    pub fn insert(&self, report: ScanReport) {
        self.jobs.write().insert(report.job_id.clone(), report);
    }

    /// Swap in the terminal record as a single visible update
    pub fn finalize(&self, report: ScanReport) {
        debug_assert!(report.status.is_terminal());
        self.jobs.write().insert(report.job_id.clone(), report);
    }

    pub fn get(&self, job_id: &str) -> Option<ScanReport> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Scan summaries, optionally filtered by host, newest first
    pub fn list(&self, host_id: Option<&str>) -> Vec<ScanSummary> {
        let mut summaries: Vec<ScanSummary> = self
            .jobs
            .read()
            .values()
            .filter(|job| host_id.map_or(true, |h| job.host_id == h))
            .map(|job| ScanSummary {
                job_id: job.job_id.clone(),
                host_id: job.host_id.clone(),
                status: job.status,
                started_at: job.started_at.clone(),
                baseline_score: job.baseline_score,
                changes_count: job.changes.len() as u64,
            })
            .collect();

        // ISO-8601 strings sort lexicographically in chronological order
        summaries.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        summaries
    }

    pub fn running_count(&self) -> usize {
        self.jobs
            .read()
            .values()
            .filter(|job| job.status == JobStatus::Running)
            .count()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }
}

/// Export a scan report as a pretty-printed JSON string
pub fn report_to_json(report: &ScanReport) -> dw_error::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Export a scan report as a compact JSON string
pub fn report_to_json_compact(report: &ScanReport) -> dw_error::Result<String> {
    Ok(serde_json::to_string(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dw_protocol::Severity;

    fn running(job_id: &str, host_id: &str, started_at: &str) -> ScanReport {
        ScanReport {
            job_id: job_id.to_string(),
            host_id: host_id.to_string(),
            status: JobStatus::Running,
            started_at: started_at.to_string(),
            completed_at: None,
            scan_paths: vec!["/data".to_string()],
            files_scanned: 0,
            changes: Vec::new(),
            baseline_score: 100,
            severity: Severity::Low,
            error: None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let table = JobTable::new();
        table.insert(running("scan-aaaa0001", "H1", "2026-08-07T10:00:00Z"));

        let job = table.get("scan-aaaa0001").unwrap();
        assert_eq!(job.status, JobStatus::Running);
        assert!(table.get("scan-unknown").is_none());
    }

    #[test]
    fn test_finalize_replaces_whole_record() {
        let table = JobTable::new();
        table.insert(running("scan-aaaa0001", "H1", "2026-08-07T10:00:00Z"));

        let mut terminal = running("scan-aaaa0001", "H1", "2026-08-07T10:00:00Z");
        terminal.status = JobStatus::Completed;
        terminal.completed_at = Some("2026-08-07T10:00:05Z".to_string());
        terminal.files_scanned = 12;
        terminal.baseline_score = 96;
        table.finalize(terminal);

        let job = table.get("scan-aaaa0001").unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.files_scanned, 12);
        assert_eq!(job.baseline_score, 96);
        assert_eq!(table.running_count(), 0);
    }

    #[test]
    fn test_list_sorted_newest_first() {
        let table = JobTable::new();
        table.insert(running("scan-aaaa0001", "H1", "2026-08-07T10:00:00Z"));
        table.insert(running("scan-aaaa0002", "H1", "2026-08-07T12:00:00Z"));
        table.insert(running("scan-aaaa0003", "H1", "2026-08-07T11:00:00Z"));

        let listed = table.list(None);
        let ids: Vec<&str> = listed.iter().map(|s| s.job_id.as_str()).collect();
        assert_eq!(ids, vec!["scan-aaaa0002", "scan-aaaa0003", "scan-aaaa0001"]);
    }

    #[test]
    fn test_list_filters_by_host() {
        let table = JobTable::new();
        table.insert(running("scan-aaaa0001", "H1", "2026-08-07T10:00:00Z"));
        table.insert(running("scan-aaaa0002", "H2", "2026-08-07T11:00:00Z"));

        let listed = table.list(Some("H2"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].host_id, "H2");
        assert_eq!(table.list(None).len(), 2);
        assert!(table.list(Some("H3")).is_empty());
    }

    #[test]
    fn test_report_json_export() {
        let report = running("scan-aaaa0001", "H1", "2026-08-07T10:00:00Z");
        let json = report_to_json(&report).unwrap();
        assert!(json.contains("\"status\": \"running\""));
        assert!(json.contains("scan-aaaa0001"));
        // Optional fields are omitted while unset
        assert!(!json.contains("completed_at"));

        let compact = report_to_json_compact(&report).unwrap();
        assert!(compact.len() < json.len());
    }
}
