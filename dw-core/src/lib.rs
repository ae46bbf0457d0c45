//! Driftwatch Core Library
//!
//! Host file-integrity baseline engine: scans filesystem paths, fingerprints
//! every reachable file, and detects deviations from a previously recorded
//! baseline, classifying each deviation by risk and rolling the results into
//! an overall severity verdict.
//!
//! # Module Structure
//!
//! - `hashing` - Streaming SHA-256 file fingerprints with graceful degradation
//! - `risk` - Substring-heuristic path risk classification
//! - `snapshot` - Bounded filesystem traversal producing fingerprint maps
//! - `baseline` - Per-host reference snapshots (process-lifetime storage)
//! - `diff` - Snapshot comparison producing change records
//! - `severity` - Baseline score and overall severity aggregation
//! - `jobs` / `manager` - Scan job lifecycle and orchestration
//!
//! # Example
//!
//! ```no_run
//! use dw_core::ScanManager;
//!
//! # async fn demo() -> dw_error::Result<()> {
//! let manager = ScanManager::new();
//!
//! // First scan records the baseline; later scans diff against it
//! let ack = manager.start_scan("WIN-SRV-01", Some(vec!["/etc".into()]))?;
//! let report = manager.get_results(&ack.job_id)?;
//! # Ok(())
//! # }
//! ```

pub mod baseline;
pub mod constants;
pub mod diff;
pub mod hashing;
pub mod ident;
pub mod jobs;
pub mod manager;
pub mod risk;
pub mod severity;
pub mod snapshot;

// Re-export primary engine types
pub use baseline::BaselineStore;
pub use hashing::{fingerprint_file, HASH_FAILED};
pub use jobs::{report_to_json, report_to_json_compact, JobTable};
pub use manager::ScanManager;
pub use risk::{classify, HIGH_RISK_PATTERNS, MEDIUM_RISK_PATTERNS};
pub use severity::aggregate;
pub use snapshot::{capture_snapshot, FileRecord, Snapshot, SnapshotOutcome};

// Re-export the shared error and protocol vocabulary
pub use dw_error::{DriftwatchError, Result};
pub use dw_protocol::{
    BaselineSummary, ChangeKind, ChangeRecord, JobStatus, RiskTier, ScanAck, ScanReport,
    ScanSummary, Severity,
};

pub use diff::{diff_snapshots, missing_root_change};
