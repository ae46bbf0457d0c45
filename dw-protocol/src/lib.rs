//! Shared protocol types for Driftwatch
//!
//! Transport-agnostic request and response types exchanged between the
//! integrity engine and whatever dispatcher fronts it. The dispatcher owns
//! transport concerns (sockets, HTTP status codes, body framing); this crate
//! owns the shape and validation of the messages themselves.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global request ID counter for correlation
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Maximum host identifier length
pub const MAX_HOST_ID_LENGTH: usize = 128;

/// Maximum scan path length
pub const MAX_PATH_LENGTH: usize = 1024;

/// Maximum number of roots a single scan request may carry
pub const MAX_SCAN_PATHS: usize = 32;

const FORBIDDEN_PATH_BYTES: &[char] = &['\0', '\n', '\r'];

/// Generate a unique request ID for correlation
pub fn generate_request_id() -> u64 {
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation and debugging
    pub id: u64,
    /// The actual request
    #[serde(flatten)]
    pub request: Request,
}

impl RequestEnvelope {
    pub fn new(request: Request) -> Self {
        Self {
            id: generate_request_id(),
            request,
        }
    }

    pub fn with_id(request: Request, id: u64) -> Self {
        Self { id, request }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "data")]
pub enum Request {
    /// Start an integrity scan; omitted paths fall back to the default root set
    StartScan {
        host_id: String,
        scan_paths: Option<Vec<String>>,
    },
    GetResults { job_id: String },
    GetBaseline { host_id: String },
    /// Scan alias: creates the baseline if absent, otherwise diffs against it
    CreateBaseline { host_id: String },
    /// Explicit re-baseline: the fresh snapshot replaces any existing baseline
    ReplaceBaseline {
        host_id: String,
        scan_paths: Option<Vec<String>>,
    },
    ListScans { host_id: Option<String> },
}

impl Request {
    /// Validate request parameters before handing them to the engine
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Request::StartScan { host_id, scan_paths } => {
                validate_host_id(host_id)?;
                if let Some(paths) = scan_paths {
                    validate_scan_paths(paths)?;
                }
                Ok(())
            }
            Request::GetResults { job_id } => validate_job_id(job_id),
            Request::ReplaceBaseline { host_id, scan_paths } => {
                validate_host_id(host_id)?;
                if let Some(paths) = scan_paths {
                    validate_scan_paths(paths)?;
                }
                Ok(())
            }
            Request::GetBaseline { host_id } | Request::CreateBaseline { host_id } => {
                validate_host_id(host_id)
            }
            Request::ListScans { host_id } => {
                if let Some(h) = host_id {
                    validate_host_id(h)?;
                }
                Ok(())
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Request::StartScan { .. } => "StartScan",
            Request::GetResults { .. } => "GetResults",
            Request::GetBaseline { .. } => "GetBaseline",
            Request::CreateBaseline { .. } => "CreateBaseline",
            Request::ReplaceBaseline { .. } => "ReplaceBaseline",
            Request::ListScans { .. } => "ListScans",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Request ID this response corresponds to
    pub id: u64,
    /// The actual response
    #[serde(flatten)]
    pub response: Response,
}

impl ResponseEnvelope {
    pub fn new(id: u64, response: Response) -> Self {
        Self { id, response }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Response {
    #[serde(rename = "ok")]
    Ok(ResponseData),
    #[serde(rename = "not_found")]
    NotFound { message: String },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data - each variant has a unique structure that serde can distinguish
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ack: Option<ScanAck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ScanReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scans: Option<Vec<ScanSummary>>,
}

impl ResponseData {
    pub fn none() -> Self { Self::default() }
    pub fn ack(a: ScanAck) -> Self { Self { ack: Some(a), ..Self::default() } }
    pub fn report(r: ScanReport) -> Self { Self { report: Some(r), ..Self::default() } }
    pub fn baseline(b: BaselineSummary) -> Self { Self { baseline: Some(b), ..Self::default() } }
    pub fn scan_list(s: Vec<ScanSummary>) -> Self { Self { scans: Some(s), ..Self::default() } }
}

impl Response {
    pub fn ok() -> Self {
        Response::Ok(ResponseData::none())
    }

    pub fn ok_ack(a: ScanAck) -> Self {
        Response::Ok(ResponseData::ack(a))
    }

    pub fn ok_report(r: ScanReport) -> Self {
        Response::Ok(ResponseData::report(r))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Response::NotFound { message: msg.into() }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Response::Error { message: msg.into() }
    }
}

// ============================================================================
// Domain Enums
// ============================================================================

/// Lifecycle state of a scan job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// A job is terminal once it leaves `running`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

/// Overall severity verdict for a completed scan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Risk classification of a single filesystem location
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Kind of deviation from the baseline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    New,
    Modified,
    Deleted,
    PathNotFound,
}

// ============================================================================
// Wire DTOs
// ============================================================================

/// One detected deviation from the baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: String,
    pub change: ChangeKind,
    /// Present for new/modified changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Present for modified changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_fingerprint: Option<String>,
    pub risk: RiskTier,
}

/// Acknowledgement returned when a scan is accepted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanAck {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
}

/// Full results of one scan job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub job_id: String,
    pub host_id: String,
    pub status: JobStatus,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub scan_paths: Vec<String>,
    pub files_scanned: u64,
    pub changes: Vec<ChangeRecord>,
    pub baseline_score: u8,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read-only projection of a stored baseline (the raw snapshot never leaves the engine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub host_id: String,
    pub created_at: String,
    pub file_count: u64,
    pub last_scan_at: String,
}

/// One row of a scan listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub job_id: String,
    pub host_id: String,
    pub status: JobStatus,
    pub started_at: String,
    pub baseline_score: u8,
    pub changes_count: u64,
}

// ============================================================================
// Validation
// ============================================================================

pub fn validate_host_id(host_id: &str) -> Result<(), String> {
    if host_id.is_empty() {
        return Err("Host id cannot be empty".into());
    }

    if host_id.len() > MAX_HOST_ID_LENGTH {
        return Err(format!(
            "Host id too long: {} > {} chars",
            host_id.len(),
            MAX_HOST_ID_LENGTH
        ));
    }

    for c in host_id.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
            return Err(format!("Host id contains invalid character: {:?}", c));
        }
    }

    Ok(())
}

pub fn validate_job_id(job_id: &str) -> Result<(), String> {
    if job_id.is_empty() {
        return Err("Job id cannot be empty".into());
    }

    if job_id.len() > MAX_HOST_ID_LENGTH {
        return Err(format!(
            "Job id too long: {} > {} chars",
            job_id.len(),
            MAX_HOST_ID_LENGTH
        ));
    }

    Ok(())
}

pub fn validate_scan_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Scan path cannot be empty".into());
    }

    if path.len() > MAX_PATH_LENGTH {
        return Err(format!(
            "Scan path too long: {} > {} chars",
            path.len(),
            MAX_PATH_LENGTH
        ));
    }

    for forbidden in FORBIDDEN_PATH_BYTES {
        if path.contains(*forbidden) {
            return Err(format!("Scan path contains forbidden character: {:?}", forbidden));
        }
    }

    Ok(())
}

pub fn validate_scan_paths(paths: &[String]) -> Result<(), String> {
    if paths.is_empty() {
        return Err("Scan path list cannot be empty (omit it to use defaults)".into());
    }

    if paths.len() > MAX_SCAN_PATHS {
        return Err(format!(
            "Too many scan paths: {} > {}",
            paths.len(),
            MAX_SCAN_PATHS
        ));
    }

    for path in paths {
        validate_scan_path(path)?;
    }

    Ok(())
}
