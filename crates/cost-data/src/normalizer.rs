//! Instance-hour normalization.
//!
//! Turns summed instance-hours per resource type into the average number of
//! instances running per hour of the billing period.

use std::collections::BTreeSet;

use cost_core::models::{BillingRecord, NormalizedUsage};
use cost_core::period::{hours_in_period, DEFAULT_BILLING_PERIOD};

/// Average instances per hour for every resource type present in `records`.
///
/// `total instance-hours / (days-in-month × 24)` for `period`.
pub fn normalize(records: &[BillingRecord], period: &str) -> NormalizedUsage {
    let hours = f64::from(hours_in_period(period));

    let mut usage = NormalizedUsage::new();
    for record in records {
        *usage.entry(record.resource_type).or_insert(0.0) += record.instance_hours;
    }

    for total in usage.values_mut() {
        *total /= hours;
    }

    usage
}

/// The billing period for a run: the period of the first record.
///
/// Records from other periods are normalized against this one as well.
pub fn billing_period(records: &[BillingRecord]) -> &str {
    records
        .first()
        .map(|r| r.period.as_str())
        .unwrap_or(DEFAULT_BILLING_PERIOD)
}

/// Every distinct period string across `records`, sorted.
pub fn distinct_periods(records: &[BillingRecord]) -> BTreeSet<&str> {
    records.iter().map(|r| r.period.as_str()).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
