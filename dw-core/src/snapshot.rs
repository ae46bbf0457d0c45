//! Point-in-time filesystem snapshots
//!
//! Walks a bounded set of root paths and fingerprints every regular file
//! reachable beneath them. Traversal is deliberately tolerant:
//!
//! - A missing root is recorded and skipped, never an error.
//! - A file that cannot be read mid-scan is omitted from the snapshot.
//! - A root that fails wholesale is logged and skipped; partial results from
//!   other roots are preserved.
//! - A global file budget bounds worst-case scan duration; traversal stops
//!   early once it is reached.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace, warn};

use dw_error::DriftwatchError;

use crate::constants::scan::FILE_BUDGET;
use crate::hashing::fingerprint_file;
use crate::ident;

/// One entry in a snapshot. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    /// SHA-256 hex digest, or the `hash_failed` sentinel
    pub fingerprint: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time, ISO-8601 UTC
    pub modified_at: String,
}

/// Complete fingerprint map produced by one traversal, keyed by path
pub type Snapshot = HashMap<String, FileRecord>;

/// Result of one bounded traversal
#[derive(Debug, Clone, Default)]
pub struct SnapshotOutcome {
    pub snapshot: Snapshot,
    /// Roots that did not exist when the traversal reached them
    pub missing_roots: Vec<String>,
}

impl SnapshotOutcome {
    pub fn files_scanned(&self) -> u64 {
        self.snapshot.len() as u64
    }
}

/// Walk each root recursively and fingerprint every regular file found,
/// up to the global file budget.
pub fn capture_snapshot(roots: &[String]) -> SnapshotOutcome {
    let mut outcome = SnapshotOutcome::default();

    for root in roots {
        if outcome.snapshot.len() >= FILE_BUDGET {
            debug!(budget = FILE_BUDGET, "File budget exhausted, stopping traversal");
            break;
        }

        let root_path = Path::new(root);
        if !root_path.exists() {
            warn!(root = %root, "Scan root does not exist");
            outcome.missing_roots.push(root.clone());
            continue;
        }

        debug!(root = %root, "Scanning root");
        if let Err(e) = walk_dir(root_path, &mut outcome.snapshot) {
            warn!(root = %root, error = %e, "Error scanning root, continuing with next");
        }
    }

    debug!(
        files = outcome.snapshot.len(),
        missing_roots = outcome.missing_roots.len(),
        "Snapshot complete"
    );
    outcome
}

fn walk_dir(dir: &Path, snapshot: &mut Snapshot) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        if snapshot.len() >= FILE_BUDGET {
            return Ok(());
        }

        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(dir = ?dir, error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                debug!(path = ?path, error = %e, "Cannot determine entry type");
                continue;
            }
        };

        if file_type.is_dir() {
            // file_type() does not follow symlinks, so symlinked directories
            // are never descended into (cycle guard)
            if let Err(e) = walk_dir(&path, snapshot) {
                debug!(dir = ?path, error = %e, "Skipping unreadable subdirectory");
            }
        } else if file_type.is_file() {
            match read_file_record(&path) {
                Ok(record) => {
                    trace!(path = ?path, size = record.size, "Recorded file");
                    snapshot.insert(path.to_string_lossy().into_owned(), record);
                }
                Err(e) => {
                    debug!(path = ?path, error = %e, "Cannot access file, omitting from snapshot");
                }
            }
        }
    }

    Ok(())
}

/// Fingerprint and stat one file. The per-file Result is collapsed by the
/// caller: successes enter the snapshot, failures are logged and dropped.
fn read_file_record(path: &Path) -> dw_error::Result<FileRecord> {
    let metadata = fs::metadata(path).map_err(|source| DriftwatchError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let modified_at = metadata
        .modified()
        .map(ident::from_system_time)
        .unwrap_or_default();

    Ok(FileRecord {
        fingerprint: fingerprint_file(path),
        size: metadata.len(),
        modified_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> String {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_records_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();

        let top = write_file(dir.path(), "a.bin", b"alpha");
        let deep = write_file(&sub, "b.bin", b"bravo");

        let outcome = capture_snapshot(&[dir.path().to_string_lossy().into_owned()]);
        assert_eq!(outcome.files_scanned(), 2);
        assert!(outcome.missing_roots.is_empty());

        let record = &outcome.snapshot[&top];
        assert_eq!(record.size, 5);
        assert_eq!(record.fingerprint.len(), 64);
        assert!(!record.modified_at.is_empty());
        assert!(outcome.snapshot.contains_key(&deep));
    }

    #[test]
    fn test_missing_root_is_recorded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "present.txt", b"data");

        let roots = vec![
            "/nonexistent/driftwatch/root".to_string(),
            dir.path().to_string_lossy().into_owned(),
        ];
        let outcome = capture_snapshot(&roots);

        assert_eq!(outcome.missing_roots, vec!["/nonexistent/driftwatch/root".to_string()]);
        assert_eq!(outcome.files_scanned(), 1);
    }

    #[test]
    fn test_file_budget_stops_traversal() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..FILE_BUDGET + 20 {
            write_file(dir.path(), &format!("f{:04}", i), b"x");
        }

        let outcome = capture_snapshot(&[dir.path().to_string_lossy().into_owned()]);
        assert_eq!(outcome.snapshot.len(), FILE_BUDGET);
    }

    #[test]
    fn test_identical_traversals_produce_identical_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "one.cfg", b"[section]");
        write_file(dir.path(), "two.cfg", b"key=value");

        let roots = vec![dir.path().to_string_lossy().into_owned()];
        let first = capture_snapshot(&roots);
        let second = capture_snapshot(&roots);
        assert_eq!(first.snapshot, second.snapshot);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_hashes_as_sentinel() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "secret.key", b"private");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        let outcome = capture_snapshot(&[dir.path().to_string_lossy().into_owned()]);

        // Metadata is still readable, so the file is recorded with the
        // degraded fingerprint (unless running as root, which can read it)
        if let Some(record) = outcome.snapshot.get(&path) {
            assert!(record.fingerprint == crate::hashing::HASH_FAILED || record.fingerprint.len() == 64);
        }

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    }
}
