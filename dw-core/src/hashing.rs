//! File content fingerprinting
//!
//! Streams file bytes through SHA-256 in fixed-size chunks so memory use is
//! independent of file size. Integrity scanning must not abort because one
//! file is unreadable, so any open or read failure collapses to the
//! [`HASH_FAILED`] sentinel instead of an error.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::constants::scan::HASH_CHUNK_SIZE;

/// Sentinel fingerprint recorded when a file cannot be read
pub const HASH_FAILED: &str = "hash_failed";

/// Compute the SHA-256 hex fingerprint of a file's contents
pub fn fingerprint_file(path: &Path) -> String {
    match hash_file(path) {
        Ok(hex) => hex,
        Err(e) => {
            debug!(path = ?path, error = %e, "Cannot hash file");
            HASH_FAILED.to_string()
        }
    }
}

fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_digest() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // SHA-256 of the empty string
        assert_eq!(
            fingerprint_file(file.path()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_identical_content_same_fingerprint() {
        let mut a = tempfile::NamedTempFile::new().unwrap();
        let mut b = tempfile::NamedTempFile::new().unwrap();
        a.write_all(b"driver payload").unwrap();
        b.write_all(b"driver payload").unwrap();

        let fp_a = fingerprint_file(a.path());
        let fp_b = fingerprint_file(b.path());
        assert_eq!(fp_a, fp_b);
        assert_eq!(fp_a.len(), 64);
        assert!(fp_a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_content_different_fingerprint() {
        let mut a = tempfile::NamedTempFile::new().unwrap();
        let mut b = tempfile::NamedTempFile::new().unwrap();
        a.write_all(b"original").unwrap();
        b.write_all(b"tampered").unwrap();
        assert_ne!(fingerprint_file(a.path()), fingerprint_file(b.path()));
    }

    #[test]
    fn test_large_file_is_chunked() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let payload = vec![0xA5u8; HASH_CHUNK_SIZE * 3 + 17];
        file.write_all(&payload).unwrap();

        let fp = fingerprint_file(file.path());
        assert_ne!(fp, HASH_FAILED);
        assert_eq!(fp.len(), 64);
    }

    #[test]
    fn test_unreadable_file_yields_sentinel() {
        let fp = fingerprint_file(Path::new("/nonexistent/driftwatch/file.bin"));
        assert_eq!(fp, HASH_FAILED);
    }
}
