//! Job identity and timestamps
//!
//! Job ids are opaque and collision-resistant (`scan-` plus the first 8 hex
//! characters of a v4 UUID). Timestamps are ISO-8601 UTC throughout.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// Generate an opaque scan job identifier
pub fn generate_job_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("scan-{}", &id[..8])
}

/// Current UTC time as an ISO-8601 string
pub fn utc_now() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

/// Convert a filesystem timestamp to an ISO-8601 UTC string
pub fn from_system_time(ts: std::time::SystemTime) -> String {
    format_timestamp(OffsetDateTime::from(ts))
}

fn format_timestamp(ts: OffsetDateTime) -> String {
    // Rfc3339 formatting only fails for years outside its range
    ts.format(&Rfc3339)
        .unwrap_or_else(|_| ts.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_shape() {
        let id = generate_job_id();
        assert!(id.starts_with("scan-"));
        assert_eq!(id.len(), "scan-".len() + 8);
        assert!(id["scan-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_job_ids_are_unique() {
        let a = generate_job_id();
        let b = generate_job_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_timestamp_is_utc_iso8601() {
        let ts = utc_now();
        assert!(ts.ends_with('Z'), "expected UTC designator in {}", ts);
        assert!(ts.contains('T'));
    }

    #[test]
    fn test_timestamps_sort_chronologically() {
        let earlier = from_system_time(std::time::UNIX_EPOCH);
        let later = utc_now();
        assert!(earlier < later);
    }
}
