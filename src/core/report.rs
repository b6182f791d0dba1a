//! Salary report generation over the payslip ledger.
//!
//! Reports filter the ledger by optional year, month and name fragment, list
//! the newest periods first and total the net salary of what remains. All
//! functions return structured data that the bot layer formats.

use crate::{
    core::{ledger, payroll::compare_names, period::validate_month},
    entities::payslip,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Optional criteria narrowing a salary report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Keep only this year
    pub year: Option<i32>,
    /// Keep only this month (1-12)
    pub month: Option<u32>,
    /// Keep only names containing this fragment, case-insensitive
    pub name: Option<String>,
}

impl ReportFilter {
    /// Whether `slip` passes every criterion that is set.
    #[must_use]
    pub fn matches(&self, slip: &payslip::Model) -> bool {
        if self.year.is_some_and(|year| slip.year != year) {
            return false;
        }
        if self.month.is_some_and(|month| slip.month != month) {
            return false;
        }
        match self.name.as_deref().map(str::trim) {
            Some(fragment) if !fragment.is_empty() => slip
                .employee_name
                .to_lowercase()
                .contains(&fragment.to_lowercase()),
            _ => true,
        }
    }

    /// Short human-readable description, e.g. "March 2024, name contains 'ann'".
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        match (self.month, self.year) {
            (Some(month), Some(year)) => {
                parts.push(format!("{} {year}", crate::core::period::month_name(month)));
            }
            (Some(month), None) => {
                parts.push(format!("{} (all years)", crate::core::period::month_name(month)));
            }
            (None, Some(year)) => parts.push(format!("year {year}")),
            (None, None) => parts.push("all periods".to_string()),
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            parts.push(format!("name contains '{}'", name.trim()));
        }
        parts.join(", ")
    }
}

/// A filtered view of the ledger with its total.
#[derive(Debug, Clone)]
pub struct SalaryReport {
    /// The criteria that produced this report
    pub filter: ReportFilter,
    /// Matching payslips, newest period first
    pub payslips: Vec<payslip::Model>,
    /// Sum of net salary over `payslips`
    pub total_net_salary: f64,
}

/// Filters payslips and orders them by year then month, newest first; payslips
/// of the same period are ordered by employee name.
#[must_use]
pub fn filter_payslips(
    payslips: Vec<payslip::Model>,
    filter: &ReportFilter,
) -> Vec<payslip::Model> {
    let mut matching: Vec<payslip::Model> =
        payslips.into_iter().filter(|p| filter.matches(p)).collect();

    matching.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| b.month.cmp(&a.month))
            .then_with(|| compare_names(&a.employee_name, &b.employee_name))
    });
    matching
}

/// Sum of net salary.
#[must_use]
pub fn total_net_salary(payslips: &[payslip::Model]) -> f64 {
    payslips
        .iter()
        .fold(0.0, |acc, slip| acc + slip.net_salary())
}

/// Loads the ledger and builds a report for `filter`.
pub async fn generate_salary_report(
    db: &DatabaseConnection,
    filter: ReportFilter,
) -> Result<SalaryReport> {
    if let Some(month) = filter.month {
        validate_month(month)?;
    }

    let all = ledger::get_all_payslips(db).await?;
    let payslips = filter_payslips(all, &filter);
    let total_net_salary = total_net_salary(&payslips);

    Ok(SalaryReport {
        filter,
        payslips,
        total_net_salary,
    })
}

/// Formats an amount with thousands separators, e.g. `12,345.50`.
#[must_use]
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}
