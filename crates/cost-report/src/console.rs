//! Fixed-width console rendering of the report rows.
//!
//! Also holds the worked normalization / conversion examples printed after
//! the report.

use cost_core::models::{ReportRow, ReportTotals, ResourceType};
use cost_core::period::{days_in_period, hours_in_period};
use cost_core::units::{SyntheticUnitRule, SyntheticUnitRules};

const COLUMN_WIDTH: usize = 16;
const COLUMNS: usize = 5;

fn border(left: char, mid: char, right: char) -> String {
    let segment = "═".repeat(COLUMN_WIDTH);
    let mut line = String::new();
    line.push(left);
    for i in 0..COLUMNS {
        line.push_str(&segment);
        line.push(if i + 1 == COLUMNS { right } else { mid });
    }
    line
}

fn data_line(label: &str, current: u64, ephemeral: u64, avg: f64, units: i64) -> String {
    format!("║ {label:<14} ║ {current:>14} ║ {ephemeral:>14} ║ {avg:>14.2} ║ {units:>14} ║")
}

/// Join rendered lines into a newline-terminated block.
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the summary table: header, one line per row, then a TOTAL line.
pub fn render_summary_table(rows: &[ReportRow]) -> String {
    let totals = ReportTotals::from_rows(rows);

    let mut lines = vec![
        border('╔', '╦', '╗'),
        "║  Asset Type    ║ Current Count  ║ Ephemeral Cnt  ║ Avg Inst/Hr    ║ Synthetic Unts ║"
            .to_string(),
        border('╠', '╬', '╣'),
    ];

    lines.extend(rows.iter().map(|row| {
        data_line(
            row.resource_type.as_str(),
            u64::from(row.current_count),
            u64::from(row.ephemeral_count),
            row.avg_instances_per_hour,
            row.synthetic_units,
        )
    }));

    lines.push(border('╠', '╬', '╣'));
    lines.push(data_line(
        "TOTAL",
        totals.current_count,
        totals.ephemeral_count,
        totals.avg_instances_per_hour,
        totals.synthetic_units,
    ));
    lines.push(border('╚', '╩', '╝'));

    finish(lines)
}

/// Worked example of instance-hour normalization for `period`.
pub fn render_normalization_example(period: &str) -> String {
    let days = days_in_period(period);
    let hours = hours_in_period(period);
    let hours_f = f64::from(hours);

    finish(vec![
        "=== Instance-Hour Normalization ===".to_string(),
        format!("Period: {period} ({days} days = {hours} hours)"),
        String::new(),
        "Example calculations:".to_string(),
        format!(
            "  720 instance-hours / {hours} hours = {:.2} avg instances/hr (1 VM all month)",
            720.0 / hours_f
        ),
        format!(
            "  360 instance-hours / {hours} hours = {:.2} avg instances/hr (0.5 VMs all month)",
            360.0 / hours_f
        ),
    ])
}

/// Worked example of synthetic-unit conversion with the default multipliers
/// (VM 5, Database 5, Container 2).
pub fn render_conversion_example() -> String {
    let defaults = SyntheticUnitRules::new([
        (ResourceType::VM, SyntheticUnitRule::new(5)),
        (ResourceType::Database, SyntheticUnitRule::new(5)),
        (ResourceType::Container, SyntheticUnitRule::new(2)),
    ]);
    let examples = [
        (1.0, "VM", ResourceType::VM),
        (1.5, "VMs", ResourceType::VM),
        (0.5, "Database", ResourceType::Database),
        (2.0, "Containers", ResourceType::Container),
    ];

    let mut lines = vec![
        "=== Synthetic Unit Conversion ===".to_string(),
        "Formula: Units = Average Instances Per Hour × Units Per Instance".to_string(),
        String::new(),
        "Examples (assuming default multipliers):".to_string(),
    ];
    for (avg, label, resource_type) in examples {
        let multiplier = defaults
            .get(resource_type)
            .map(|r| r.units_per_instance)
            .unwrap_or(0);
        lines.push(format!(
            "  {avg:.1} {label} × {multiplier} = {} units",
            defaults.score(resource_type, avg)
        ));
    }
    finish(lines)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
