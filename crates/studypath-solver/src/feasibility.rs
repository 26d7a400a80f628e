//! Feasibility evaluation
//!
//! Compares the daily page rate a deadline implies against the sustainable
//! pace of a tier. The same alert text is produced for a standalone preview
//! and for the alerts attached to a built plan.

use studypath_core::{FeasibilityResult, PaceTable, Tier};

/// Alert for a deadline on or before the start date
pub const NON_POSITIVE_DURATION_ALERT: &str = "Timeline duration must be positive.";

/// Pages per day needed to finish `total_pages` in `duration_days`.
///
/// `None` when the duration is not positive.
pub fn required_pages_per_day(total_pages: u64, duration_days: i64) -> Option<f64> {
    (duration_days > 0).then(|| total_pages as f64 / duration_days as f64)
}

/// Alert text for a pace the tier cannot sustain
pub fn pace_alert(required: f64, tier: Tier, capacity: u32) -> String {
    format!(
        "⚠️ Feasibility Alert: Timeline requires ~{:.1} pages/day, but the recommended pace \
         for {} is {} pages/day. Consider extending the deadline or reducing scope.",
        required, tier, capacity
    )
}

/// Evaluate whether `total_pages` fits the tier's pace over `duration_days`
pub fn evaluate(
    pace: &PaceTable,
    total_pages: u64,
    tier: Tier,
    duration_days: i64,
) -> FeasibilityResult {
    let Some(required) = required_pages_per_day(total_pages, duration_days) else {
        return FeasibilityResult::infeasible(NON_POSITIVE_DURATION_ALERT);
    };

    let capacity = pace.get(tier).pages_per_day;
    if required > f64::from(capacity) {
        FeasibilityResult::infeasible(pace_alert(required, tier, capacity))
    } else {
        FeasibilityResult::feasible()
    }
}
