//! Billing-period calendar helpers.
//!
//! Periods are `YYYY-MM` strings. Month lengths come from a fixed table:
//! February is always 28 days and anything unrecognised counts as 30.

/// Period assumed when a run has no billing records to take one from.
pub const DEFAULT_BILLING_PERIOD: &str = "2024-01";

/// Days assumed for a malformed period or an unknown month.
pub const DEFAULT_DAYS_IN_PERIOD: u32 = 30;

/// Number of days in the month named by `period`.
///
/// Only bytes `5..7` (the month) are inspected. No leap-year adjustment is
/// applied to February.
///
/// # Examples
///
/// ```
/// use cost_core::period::days_in_period;
///
/// assert_eq!(days_in_period("2024-01"), 31);
/// assert_eq!(days_in_period("2024-02"), 28);
/// assert_eq!(days_in_period("2024"), 30);
/// ```
pub fn days_in_period(period: &str) -> u32 {
    if period.len() < 7 {
        return DEFAULT_DAYS_IN_PERIOD;
    }

    match period.get(5..7) {
        Some("01" | "03" | "05" | "07" | "08" | "10" | "12") => 31,
        Some("04" | "06" | "09" | "11") => 30,
        Some("02") => 28,
        _ => DEFAULT_DAYS_IN_PERIOD,
    }
}

/// Number of hours in the month named by `period`.
pub fn hours_in_period(period: &str) -> u32 {
    days_in_period(period) * 24
}
