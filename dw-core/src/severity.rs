//! Severity aggregation
//!
//! Reduces a set of change records into a baseline score (0-100) and an
//! overall severity verdict. The thresholds are exact business rules.

use dw_protocol::{ChangeRecord, RiskTier, Severity};

use crate::constants::scoring;

/// Score and severity for a set of detected changes.
///
/// The score deducts [`scoring::POINTS_PER_CHANGE`] per change, capped at
/// [`scoring::MAX_DEDUCTION`], so it never drops below 70.
pub fn aggregate(changes: &[ChangeRecord]) -> (u8, Severity) {
    let deduction = (changes.len() as u64 * scoring::POINTS_PER_CHANGE).min(scoring::MAX_DEDUCTION);
    let score = (100 - deduction) as u8;
    (score, overall_severity(changes))
}

fn overall_severity(changes: &[ChangeRecord]) -> Severity {
    if changes.is_empty() {
        return Severity::Low;
    }

    let high = changes.iter().filter(|c| c.risk == RiskTier::High).count();
    let medium = changes.iter().filter(|c| c.risk == RiskTier::Medium).count();

    if high >= scoring::HIGH_CHANGES_FOR_HIGH || changes.len() >= scoring::TOTAL_CHANGES_FOR_HIGH {
        Severity::High
    } else if high >= scoring::HIGH_CHANGES_FOR_MEDIUM
        || medium >= scoring::MEDIUM_CHANGES_FOR_MEDIUM
    {
        Severity::Medium
    } else {
        Severity::Low
    }
}
