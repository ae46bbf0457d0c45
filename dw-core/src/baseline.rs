//! Per-host baseline storage
//!
//! Holds the last-known-good snapshot for each host for the lifetime of the
//! process. Creation is first-write-only; `replace` is the single explicit
//! overwrite path. Raw snapshots never leave the crate - external consumers
//! only see the read-only [`BaselineSummary`] projection.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

use dw_protocol::BaselineSummary;

use crate::ident;
use crate::snapshot::Snapshot;

/// Reference snapshot for one host
#[derive(Debug, Clone)]
pub(crate) struct Baseline {
    pub host_id: String,
    pub created_at: String,
    pub snapshot: Snapshot,
    pub file_count: u64,
    /// Completion time of the most recent scan against this baseline
    pub last_scan_at: String,
}

/// In-memory baseline store: exactly one live baseline per host
#[derive(Debug, Default)]
pub struct BaselineStore {
    baselines: RwLock<HashMap<String, Baseline>>,
}

impl BaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, host_id: &str) -> bool {
        self.baselines.read().contains_key(host_id)
    }

    /// Clone of the stored snapshot, for diffing
    pub(crate) fn snapshot_for(&self, host_id: &str) -> Option<Snapshot> {
        self.baselines.read().get(host_id).map(|b| b.snapshot.clone())
    }

    /// First-write-only creation. Returns false and leaves the stored
    /// baseline untouched if one already exists for the host.
    pub(crate) fn create(&self, host_id: &str, snapshot: Snapshot) -> bool {
        let mut guard = self.baselines.write();
        if guard.contains_key(host_id) {
            debug!(host = %host_id, "Baseline already exists, leaving untouched");
            return false;
        }

        let now = ident::utc_now();
        let file_count = snapshot.len() as u64;
        guard.insert(
            host_id.to_string(),
            Baseline {
                host_id: host_id.to_string(),
                created_at: now.clone(),
                snapshot,
                file_count,
                last_scan_at: now,
            },
        );

        info!(host = %host_id, files = file_count, "Created initial baseline");
        true
    }

    /// Unconditionally install a fresh baseline (explicit re-baseline)
    pub(crate) fn replace(&self, host_id: &str, snapshot: Snapshot) {
        let now = ident::utc_now();
        let file_count = snapshot.len() as u64;

        self.baselines.write().insert(
            host_id.to_string(),
            Baseline {
                host_id: host_id.to_string(),
                created_at: now.clone(),
                snapshot,
                file_count,
                last_scan_at: now,
            },
        );

        info!(host = %host_id, files = file_count, "Replaced baseline");
    }

    /// Record the completion time of a scan against this host's baseline
    pub(crate) fn record_scan(&self, host_id: &str, completed_at: &str) {
        if let Some(baseline) = self.baselines.write().get_mut(host_id) {
            baseline.last_scan_at = completed_at.to_string();
        }
    }

    /// Read-only projection exposed to API consumers
    pub fn summary(&self, host_id: &str) -> Option<BaselineSummary> {
        self.baselines.read().get(host_id).map(|b| BaselineSummary {
            host_id: b.host_id.clone(),
            created_at: b.created_at.clone(),
            file_count: b.file_count,
            last_scan_at: b.last_scan_at.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.baselines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FileRecord;

    fn snapshot(paths: &[&str]) -> Snapshot {
        paths
            .iter()
            .map(|p| {
                (
                    p.to_string(),
                    FileRecord {
                        fingerprint: format!("fp-{}", p),
                        size: 1,
                        modified_at: "2026-08-07T00:00:00Z".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_create_is_first_write_only() {
        let store = BaselineStore::new();
        assert!(store.create("H1", snapshot(&["/data/a", "/data/b"])));
        assert!(!store.create("H1", snapshot(&["/data/c"])));

        let summary = store.summary("H1").unwrap();
        assert_eq!(summary.file_count, 2);
    }

    #[test]
    fn test_replace_overwrites() {
        let store = BaselineStore::new();
        store.create("H1", snapshot(&["/data/a", "/data/b"]));
        store.replace("H1", snapshot(&["/data/c"]));

        let summary = store.summary("H1").unwrap();
        assert_eq!(summary.file_count, 1);
        assert!(store.snapshot_for("H1").unwrap().contains_key("/data/c"));
    }

    #[test]
    fn test_unknown_host_is_absent() {
        let store = BaselineStore::new();
        assert!(store.summary("ghost").is_none());
        assert!(store.snapshot_for("ghost").is_none());
        assert!(!store.contains("ghost"));
    }

    #[test]
    fn test_record_scan_updates_last_scan_at() {
        let store = BaselineStore::new();
        store.create("H1", snapshot(&["/data/a"]));
        store.record_scan("H1", "2030-01-01T00:00:00Z");

        let summary = store.summary("H1").unwrap();
        assert_eq!(summary.last_scan_at, "2030-01-01T00:00:00Z");
        assert!(summary.created_at < summary.last_scan_at);
    }

    #[test]
    fn test_hosts_are_independent() {
        let store = BaselineStore::new();
        store.create("H1", snapshot(&["/data/a"]));
        store.create("H2", snapshot(&["/data/b", "/data/c"]));

        assert_eq!(store.len(), 2);
        assert_eq!(store.summary("H1").unwrap().file_count, 1);
        assert_eq!(store.summary("H2").unwrap().file_count, 2);
    }
}
