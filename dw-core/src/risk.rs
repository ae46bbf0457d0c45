//! Path risk classification
//!
//! A pure function of the path text: case-insensitive substring heuristics
//! mapping filesystem locations to a coarse risk tier. The high-risk table is
//! evaluated before the medium-risk table and the first match wins, so a path
//! matching both tiers classifies high.

use dw_protocol::RiskTier;

/// Locations where a change most likely indicates tampering: driver and
/// system-configuration directories, the core system binaries directory,
/// startup/autorun locations, `run\` registry-style fragments, temp
/// directories, and public/shared directories.
pub const HIGH_RISK_PATTERNS: &[&str] = &[
    "system32\\drivers",
    "system32/drivers",
    "system32\\config",
    "system32/config",
    "windows\\system32\\",
    "windows/system32/",
    "startup",
    "run\\",
    "temp\\",
    "temp/",
    "public\\",
    "public/",
    "/etc/",
    "/boot/",
    "/usr/lib/modules",
];

/// Program-installation directories, shared application data, and per-user
/// home directories.
pub const MEDIUM_RISK_PATTERNS: &[&str] = &[
    "program files",
    "programdata",
    "users\\",
    "users/",
    "/opt/",
    "/usr/local/",
    "/home/",
];

/// Classify a filesystem path into a risk tier
pub fn classify(path: &str) -> RiskTier {
    let lowered = path.to_lowercase();

    if HIGH_RISK_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return RiskTier::High;
    }

    if MEDIUM_RISK_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return RiskTier::Medium;
    }

    RiskTier::Low
}
