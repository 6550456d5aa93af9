//! Spreadsheet export of the report rows.
//!
//! One header row, one row per asset type and a TOTAL row whose cells are
//! native `SUM` formulas over the data range.

use std::path::Path;

use cost_core::error::{CostError, Result};
use cost_core::models::ReportRow;
use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};

/// Column headers, in sheet order.
pub const HEADERS: [&str; 5] = [
    "Asset Type",
    "Current Count",
    "Ephemeral Count",
    "Avg Instances/Hr",
    "Synthetic Units",
];

const COLUMN_WIDTHS: [f64; 5] = [15.0, 15.0, 16.0, 18.0, 15.0];
const COLUMN_LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];
const SHEET_NAME: &str = "Sheet1";

/// `SUM` formula over data rows `2..=last_row` of column `letter`.
pub fn sum_formula(letter: char, last_row: u32) -> String {
    format!("=SUM({letter}2:{letter}{last_row})")
}

/// Build the workbook for `rows` in memory.
pub fn build_workbook(rows: &[ReportRow]) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD3D3D3));
    let avg_format = Format::new().set_num_format("0.00");
    let total_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xFFFF00));
    let total_avg_format = total_format.clone().set_num_format("0.00");

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, row.resource_type.as_str())?;
        sheet.write_number(r, 1, f64::from(row.current_count))?;
        sheet.write_number(r, 2, f64::from(row.ephemeral_count))?;
        sheet.write_number_with_format(r, 3, row.avg_instances_per_hour, &avg_format)?;
        sheet.write_number(r, 4, row.synthetic_units as f64)?;
    }

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    if !rows.is_empty() {
        let total_row = rows.len() as u32 + 1;
        // Excel rows are 1-based: data spans rows 2..=total_row.
        let last_data_row = total_row;

        sheet.write_string_with_format(total_row, 0, "TOTAL", &total_format)?;
        for (col, letter) in COLUMN_LETTERS.iter().enumerate().skip(1) {
            let format = if col == 3 { &total_avg_format } else { &total_format };
            sheet.write_formula_with_format(
                total_row,
                col as u16,
                sum_formula(*letter, last_data_row).as_str(),
                format,
            )?;
        }
    }

    Ok(workbook)
}

/// Write `rows` to an `.xlsx` file at `path`.
pub fn write_excel(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let to_output_error = |e: XlsxError| CostError::Output {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut workbook = build_workbook(rows).map_err(to_output_error)?;
    workbook.save(path).map_err(to_output_error)?;

    tracing::debug!("Wrote {} report rows to {}", rows.len(), path.display());
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
