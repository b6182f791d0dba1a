//! CSV export and printable payslip sheets.
//!
//! Both the salary-processing draft and the ledger report can be exported. The
//! header row is written verbatim; data rows go through the `csv` writer with
//! non-numeric fields quoted.

use crate::{
    config::app::CompanyConfig,
    core::{
        payroll::{DraftPayslip, PayrollDraft},
        report::format_money,
    },
    entities::payslip::{self, PayslipStatus},
    errors::{Error, Result},
};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use std::fmt::Write;

/// Header of the salary-processing export
pub const PROCESSING_HEADER: [&str; 7] = [
    "Employee Name",
    "Basic",
    "Allowances",
    "Summarized Overtime Pay",
    "Deductions",
    "Summarized Absent Ded.",
    "Net Salary (Total)",
];

/// Header of the salary report export
pub const REPORT_HEADER: [&str; 11] = [
    "Employee Name",
    "Month",
    "Year",
    "Basic",
    "Allowances",
    "Overtime Pay",
    "Deductions",
    "Absent Ded.",
    "Gross Salary",
    "Net Salary",
    "Status",
];

/// Flat view of a payslip shared by exports, print sheets and webhook payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipRow {
    /// Employee internal id
    pub employee_id: i64,
    /// Employee display name
    pub employee_name: String,
    /// Month (1-12)
    pub month: u32,
    /// Year
    pub year: i32,
    /// Monthly basic salary
    pub basic_salary: f64,
    /// Sum of allowances
    pub total_allowances: f64,
    /// Sum of deductions
    pub total_deductions: f64,
    /// Overtime pay
    pub overtime_pay: f64,
    /// Absence deduction
    pub absent_deduction: f64,
    /// basic + allowances + overtime
    pub gross_salary: f64,
    /// gross - deductions - absence deduction
    pub net_salary: f64,
    /// Pending or Processed
    pub status: PayslipStatus,
}

impl PayslipRow {
    /// Row for a draft payslip filed under the draft's period.
    #[must_use]
    pub fn from_draft(draft: &PayrollDraft, slip: &DraftPayslip) -> Self {
        Self {
            employee_id: slip.employee_id,
            employee_name: slip.employee_name.clone(),
            month: draft.period.month,
            year: draft.period.year,
            basic_salary: slip.basic_salary,
            total_allowances: slip.total_allowances,
            total_deductions: slip.total_deductions,
            overtime_pay: slip.overtime_pay,
            absent_deduction: slip.absent_deduction,
            gross_salary: slip.gross_salary(),
            net_salary: slip.net_salary(),
            status: slip.status,
        }
    }

    /// All rows of a draft.
    #[must_use]
    pub fn from_draft_all(draft: &PayrollDraft) -> Vec<Self> {
        draft
            .payslips
            .iter()
            .map(|slip| Self::from_draft(draft, slip))
            .collect()
    }
}

impl From<&payslip::Model> for PayslipRow {
    fn from(slip: &payslip::Model) -> Self {
        Self {
            employee_id: slip.employee_id,
            employee_name: slip.employee_name.clone(),
            month: slip.month,
            year: slip.year,
            basic_salary: slip.basic_salary,
            total_allowances: slip.total_allowances,
            total_deductions: slip.total_deductions,
            overtime_pay: slip.overtime_pay,
            absent_deduction: slip.absent_deduction,
            gross_salary: slip.gross_salary(),
            net_salary: slip.net_salary(),
            status: slip.status,
        }
    }
}

fn amount(value: f64) -> String {
    format!("{value:.2}")
}

fn write_csv(header: &[&str], rows: Vec<Vec<String>>) -> Result<String> {
    let mut buffer = header.join(",").into_bytes();
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(buffer);
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Config {
        message: format!("CSV output is not UTF-8: {e}"),
    })
}

/// CSV for the salary-processing view of a draft.
///
/// # Errors
/// [`Error::NothingToExport`] when the draft has no payslips.
pub fn processing_csv(draft: &PayrollDraft) -> Result<String> {
    if draft.payslips.is_empty() {
        return Err(Error::NothingToExport);
    }

    let rows = draft
        .payslips
        .iter()
        .map(|slip| {
            vec![
                slip.employee_name.clone(),
                amount(slip.basic_salary),
                amount(slip.total_allowances),
                amount(slip.overtime_pay),
                amount(slip.total_deductions),
                amount(slip.absent_deduction),
                amount(slip.net_salary()),
            ]
        })
        .collect();

    write_csv(&PROCESSING_HEADER, rows)
}

/// CSV for a salary report.
///
/// # Errors
/// [`Error::NothingToExport`] when `payslips` is empty.
pub fn report_csv(payslips: &[payslip::Model]) -> Result<String> {
    if payslips.is_empty() {
        return Err(Error::NothingToExport);
    }

    let rows = payslips
        .iter()
        .map(|slip| {
            vec![
                slip.employee_name.clone(),
                crate::core::period::month_name(slip.month).to_string(),
                slip.year.to_string(),
                amount(slip.basic_salary),
                amount(slip.total_allowances),
                amount(slip.overtime_pay),
                amount(slip.total_deductions),
                amount(slip.absent_deduction),
                amount(slip.gross_salary()),
                amount(slip.net_salary()),
                slip.status.to_string(),
            ]
        })
        .collect();

    write_csv(&REPORT_HEADER, rows)
}

/// Renders rows as a printable text sheet under the company letterhead.
pub fn render_print_sheet(
    company: &CompanyConfig,
    title: &str,
    rows: &[PayslipRow],
) -> Result<String> {
    let mut sheet = String::new();
    writeln!(sheet, "{}", company.name.to_uppercase())?;
    if let Some(address) = &company.address {
        writeln!(sheet, "{address}")?;
    }
    writeln!(sheet, "{}", "=".repeat(96))?;
    writeln!(sheet, "{title}")?;
    writeln!(sheet, "{}", "-".repeat(96))?;
    writeln!(
        sheet,
        "{:<24} {:>12} {:>11} {:>11} {:>11} {:>11} {:>12}",
        "Employee", "Basic", "Allowances", "Overtime", "Deductions", "Absent", "Net Salary"
    )?;

    for row in rows {
        let name: String = row.employee_name.chars().take(24).collect();
        writeln!(
            sheet,
            "{:<24} {:>12} {:>11} {:>11} {:>11} {:>11} {:>12}",
            name,
            format_money(row.basic_salary),
            format_money(row.total_allowances),
            format_money(row.overtime_pay),
            format_money(row.total_deductions),
            format_money(row.absent_deduction),
            format_money(row.net_salary)
        )?;
    }

    let total = rows.iter().fold(0.0, |acc, r| acc + r.net_salary);
    writeln!(sheet, "{}", "-".repeat(96))?;
    write!(
        sheet,
        "{:<24} {:>71}",
        format!("{} employee(s)", rows.len()),
        format!("Total: {}", format_money(total))
    )?;

    Ok(sheet)
}
