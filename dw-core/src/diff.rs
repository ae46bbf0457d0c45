//! Snapshot comparison
//!
//! Compares a fresh snapshot against the stored baseline and produces one
//! change record per deviation, each tagged with the risk tier of its path.
//! The comparison never mutates either snapshot.

use dw_protocol::{ChangeKind, ChangeRecord, RiskTier};

use crate::risk::classify;
use crate::snapshot::Snapshot;

/// Diff a current snapshot against the baseline snapshot.
///
/// Produces `new` records for paths only in `current`, `modified` records
/// (carrying both fingerprints) for paths whose fingerprint differs, and
/// `deleted` records for paths only in `baseline`.
pub fn diff_snapshots(baseline: &Snapshot, current: &Snapshot) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    for (path, record) in current {
        match baseline.get(path) {
            None => changes.push(ChangeRecord {
                path: path.clone(),
                change: ChangeKind::New,
                fingerprint: Some(record.fingerprint.clone()),
                previous_fingerprint: None,
                risk: classify(path),
            }),
            Some(previous) if previous.fingerprint != record.fingerprint => {
                changes.push(ChangeRecord {
                    path: path.clone(),
                    change: ChangeKind::Modified,
                    fingerprint: Some(record.fingerprint.clone()),
                    previous_fingerprint: Some(previous.fingerprint.clone()),
                    risk: classify(path),
                })
            }
            Some(_) => {}
        }
    }

    for path in baseline.keys() {
        if !current.contains_key(path) {
            changes.push(ChangeRecord {
                path: path.clone(),
                change: ChangeKind::Deleted,
                fingerprint: None,
                previous_fingerprint: None,
                risk: classify(path),
            });
        }
    }

    changes
}

/// Change record for a scan root that no longer exists
pub fn missing_root_change(root: &str) -> ChangeRecord {
    ChangeRecord {
        path: root.to_string(),
        change: ChangeKind::PathNotFound,
        fingerprint: None,
        previous_fingerprint: None,
        risk: RiskTier::Low,
    }
}
