//! Salary processing business logic.
//!
//! Generates one draft payslip per employee for a finalization period, summing
//! overtime pay and absence deductions over a chosen set of source months of the
//! same year. Base pay, allowances and deductions are the employee's current
//! single-month figures no matter how many source months are selected.
//!
//! Drafts live only in memory. [`finalize`] marks them processed and hands them to
//! [`ledger::replace_period`], which swaps out the whole period in one database
//! transaction.

use crate::{
    core::{ledger, period::PayPeriod, state},
    entities::{Employee, employee, overtime_record, payslip, payslip::PayslipStatus},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::collections::{BTreeSet, HashSet};
use std::fmt::Write;
use tracing::{info, warn};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// One employee's computed pay for the finalization period.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftPayslip {
    /// Employee the payslip belongs to
    pub employee_id: i64,
    /// External employee code
    pub employee_code: String,
    /// Employee display name
    pub employee_name: String,
    /// Department at the time of processing
    pub department: String,
    /// Monthly basic salary
    pub basic_salary: f64,
    /// Sum of current allowances
    pub total_allowances: f64,
    /// Sum of current deductions
    pub total_deductions: f64,
    /// Overtime worked, summed over the source months
    pub overtime_pay: f64,
    /// Overtime others worked covering this employee's absence, summed over the source months
    pub absent_deduction: f64,
    /// Pending until finalized
    pub status: PayslipStatus,
}

impl DraftPayslip {
    /// basic + allowances + overtime
    #[must_use]
    pub fn gross_salary(&self) -> f64 {
        self.basic_salary + self.total_allowances + self.overtime_pay
    }

    /// gross - deductions - absence deduction
    #[must_use]
    pub fn net_salary(&self) -> f64 {
        self.gross_salary() - self.total_deductions - self.absent_deduction
    }
}

/// A full set of draft payslips awaiting confirmation.
#[derive(Debug, Clone)]
pub struct PayrollDraft {
    /// Period the payslips will be filed under
    pub period: PayPeriod,
    /// Months whose overtime and absences were summed
    pub source_months: BTreeSet<u32>,
    /// One payslip per employee, sorted by name
    pub payslips: Vec<DraftPayslip>,
    /// When the draft was generated
    pub generated_at: DateTime<Utc>,
}

impl PayrollDraft {
    /// Sum of net salary over all drafts
    #[must_use]
    pub fn total_net_salary(&self) -> f64 {
        self.payslips
            .iter()
            .fold(0.0, |acc, slip| acc + slip.net_salary())
    }

    /// Source months as a readable list, e.g. "January, February"
    #[must_use]
    pub fn source_month_names(&self) -> String {
        self.source_months
            .iter()
            .map(|&m| crate::core::period::month_name(m))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Computes one draft payslip per employee.
///
/// `source_months` are months of `period.year` whose overtime records feed the
/// overtime pay and absence deduction; the payslips themselves are filed under
/// `period`. Employees without any matching record still get a payslip with zero
/// overtime and zero absence deduction. Absentee ids are matched as-is; no check is
/// made that the referenced employee still exists.
///
/// # Errors
/// * [`Error::NoSourceMonths`] when `source_months` is empty
/// * [`Error::InvalidMonth`] when a source month is outside 1..=12
pub fn generate(
    employees: &[employee::Model],
    overtime_records: &[overtime_record::Model],
    source_months: &BTreeSet<u32>,
    period: PayPeriod,
) -> Result<PayrollDraft> {
    if source_months.is_empty() {
        return Err(Error::NoSourceMonths);
    }
    for &month in source_months {
        crate::core::period::validate_month(month)?;
    }
    crate::core::period::validate_month(period.month)?;

    let in_source_window = |record: &&overtime_record::Model| {
        source_months
            .iter()
            .any(|&month| record.is_in_month(period.year, month))
    };

    let window: Vec<&overtime_record::Model> =
        overtime_records.iter().filter(in_source_window).collect();

    let mut payslips: Vec<DraftPayslip> = employees
        .iter()
        .map(|emp| {
            // Fold from +0.0 so an empty window is not -0.0
            let overtime_pay = window
                .iter()
                .filter(|r| r.employee_id == emp.id)
                .fold(0.0, |acc, r| acc + r.total_amount);
            let absent_deduction = window
                .iter()
                .filter(|r| r.absent_employee_id == Some(emp.id))
                .fold(0.0, |acc, r| acc + r.total_amount);

            DraftPayslip {
                employee_id: emp.id,
                employee_code: emp.employee_code.clone(),
                employee_name: emp.name.clone(),
                department: emp.department.clone(),
                basic_salary: emp.basic_salary,
                total_allowances: emp.total_allowances(),
                total_deductions: emp.total_deductions(),
                overtime_pay,
                absent_deduction,
                status: PayslipStatus::Pending,
            }
        })
        .collect();

    payslips.sort_by(|a, b| {
        compare_names(&a.employee_name, &b.employee_name)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });

    Ok(PayrollDraft {
        period,
        source_months: source_months.clone(),
        payslips,
        generated_at: Utc::now(),
    })
}

/// Name ordering used for payslip lists.
///
/// Names are compared on a folded key first (canonical decomposition, combining
/// marks stripped, lowercased) so "Émile" sorts with the E's. Accented and
/// cased spellings break ties, then the exact string, so the order is total.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|&c| !is_combining_mark(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Loads the current roster and overtime ledger and runs [`generate`] on them.
pub async fn generate_from_db(
    db: &DatabaseConnection,
    source_months: &BTreeSet<u32>,
    period: PayPeriod,
) -> Result<PayrollDraft> {
    // Validate before touching the database
    if source_months.is_empty() {
        return Err(Error::NoSourceMonths);
    }

    let snapshot = state::load_state(db).await?;
    let draft = generate(
        &snapshot.employees,
        &snapshot.overtime_records,
        source_months,
        period,
    )?;

    info!(
        "Generated {} draft payslips for {} from {} source month(s)",
        draft.payslips.len(),
        draft.period,
        draft.source_months.len()
    );
    Ok(draft)
}

/// Commits a draft to the ledger.
///
/// Every payslip is marked [`PayslipStatus::Processed`]; then all existing
/// payslips of the draft's period are replaced by the batch in one transaction.
/// Payslips of other periods are untouched.
///
/// # Errors
/// [`Error::Validation`] when an employee in the draft has been removed from the
/// roster since it was generated; the draft has to be processed again.
pub async fn finalize(
    db: &DatabaseConnection,
    mut draft: PayrollDraft,
) -> Result<Vec<payslip::Model>> {
    let roster: HashSet<i64> = Employee::find()
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();
    let removed: Vec<&str> = draft
        .payslips
        .iter()
        .filter(|slip| !roster.contains(&slip.employee_id))
        .map(|slip| slip.employee_name.as_str())
        .collect();
    if !removed.is_empty() {
        warn!(
            "Draft for {} references removed employee(s): {}",
            draft.period,
            removed.join(", ")
        );
        return Err(Error::Validation {
            message: format!(
                "{} no longer on the roster; run `/payroll process` again",
                removed.join(", ")
            ),
        });
    }

    for slip in &mut draft.payslips {
        slip.status = PayslipStatus::Processed;
    }

    let committed = ledger::replace_period(db, draft.period, &draft.payslips).await?;

    info!(
        "Finalized {} payslips for {}",
        committed.len(),
        draft.period
    );
    Ok(committed)
}

/// Formats a draft as a plain-text summary table.
pub fn format_draft_summary(draft: &PayrollDraft) -> Result<String> {
    let mut summary = format!(
        "Salary Processing - {} (source: {})\n",
        draft.period,
        draft.source_month_names()
    );
    writeln!(
        summary,
        "{:<22} {:>10} {:>10} {:>10} {:>10} {:>10} {:>11}",
        "Employee", "Basic", "Allow.", "Overtime", "Deduct.", "Absent", "Net"
    )?;

    for slip in &draft.payslips {
        writeln!(
            summary,
            "{:<22} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>11.2}",
            truncate(&slip.employee_name, 22),
            slip.basic_salary,
            slip.total_allowances,
            slip.overtime_pay,
            slip.total_deductions,
            slip.absent_deduction,
            slip.net_salary()
        )?;
    }

    write!(
        summary,
        "\n{} payslip(s) | Total net: {:.2}",
        draft.payslips.len(),
        draft.total_net_salary()
    )?;
    Ok(summary)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::employee::delete_employee;
    use crate::entities::Payslip;
    use crate::test_utils::*;

    fn months(list: &[u32]) -> BTreeSet<u32> {
        list.iter().copied().collect()
    }

    fn period(year: i32, month: u32) -> PayPeriod {
        PayPeriod::new(year, month).unwrap()
    }

    #[test]
    fn test_generate_worked_example() {
        let alice = employee_model(1, "Alice", 10000.0, &[500.0], &[200.0]);
        let bob = employee_model(2, "Bob", 8000.0, &[], &[]);
        let records = vec![
            overtime_model(1, 1, (2024, 1, 10), 300.0, None),
            // Bob covered Alice's absence
            overtime_model(2, 2, (2024, 1, 12), 150.0, Some(1)),
        ];

        let draft = generate(&[alice, bob], &records, &months(&[1]), period(2024, 1)).unwrap();
        let alice_slip = &draft.payslips[0];

        assert_eq!(alice_slip.employee_name, "Alice");
        assert_eq!(alice_slip.overtime_pay, 300.0);
        assert_eq!(alice_slip.absent_deduction, 150.0);
        assert_eq!(alice_slip.gross_salary(), 10800.0);
        assert_eq!(alice_slip.net_salary(), 10450.0);
        assert_eq!(alice_slip.status, PayslipStatus::Pending);

        let bob_slip = &draft.payslips[1];
        assert_eq!(bob_slip.overtime_pay, 150.0);
        assert_eq!(bob_slip.absent_deduction, 0.0);
    }

    #[test]
    fn test_generate_sums_across_source_months() {
        let alice = employee_model(1, "Alice", 10000.0, &[], &[]);
        let records = vec![
            overtime_model(1, 1, (2024, 1, 5), 300.0, None),
            overtime_model(2, 1, (2024, 2, 5), 200.0, None),
            // Outside the window
            overtime_model(3, 1, (2024, 3, 5), 999.0, None),
            overtime_model(4, 1, (2023, 1, 5), 999.0, None),
        ];
        let employees = [alice];

        let both = generate(&employees, &records, &months(&[1, 2]), period(2024, 3)).unwrap();
        let jan = generate(&employees, &records, &months(&[1]), period(2024, 3)).unwrap();
        let feb = generate(&employees, &records, &months(&[2]), period(2024, 3)).unwrap();

        assert_eq!(both.payslips[0].overtime_pay, 500.0);
        assert_eq!(
            both.payslips[0].overtime_pay,
            jan.payslips[0].overtime_pay + feb.payslips[0].overtime_pay
        );
    }

    #[test]
    fn test_generate_keeps_allowances_single_period() {
        let alice = employee_model(1, "Alice", 10000.0, &[500.0, 250.0], &[100.0]);

        let draft = generate(&[alice], &[], &months(&[1, 2, 3]), period(2024, 3)).unwrap();
        let slip = &draft.payslips[0];

        assert_eq!(slip.total_allowances, 750.0);
        assert_eq!(slip.total_deductions, 100.0);
        assert_eq!(slip.basic_salary, 10000.0);
    }

    #[test]
    fn test_generate_without_records_still_produces_payslips() {
        let employees = vec![
            employee_model(1, "Alice", 10000.0, &[], &[]),
            employee_model(2, "Bob", 9000.0, &[100.0], &[50.0]),
        ];

        let draft = generate(&employees, &[], &months(&[1]), period(2024, 1)).unwrap();

        assert_eq!(draft.payslips.len(), 2);
        for slip in &draft.payslips {
            assert_eq!(slip.overtime_pay, 0.0);
            assert_eq!(slip.absent_deduction, 0.0);
            assert!(slip.overtime_pay.is_sign_positive());
            assert!(slip.absent_deduction.is_sign_positive());
            assert!(slip.total_allowances.is_sign_positive());
        }
        assert_eq!(draft.payslips[1].net_salary(), 9050.0);

        let summary = format_draft_summary(&draft).unwrap();
        assert!(!summary.contains("-0.00"));
    }

    #[test]
    fn test_generate_rejects_empty_source_months() {
        let employees = vec![employee_model(1, "Alice", 10000.0, &[], &[])];

        let result = generate(&employees, &[], &BTreeSet::new(), period(2024, 1));
        assert!(matches!(result, Err(Error::NoSourceMonths)));
    }

    #[test]
    fn test_generate_rejects_invalid_source_month() {
        let result = generate(&[], &[], &months(&[1, 13]), period(2024, 1));
        assert!(matches!(result, Err(Error::InvalidMonth { month: 13 })));
    }

    #[test]
    fn test_generate_sorts_by_name() {
        let employees = vec![
            employee_model(1, "zoe", 1000.0, &[], &[]),
            employee_model(2, "Bob", 1000.0, &[], &[]),
            employee_model(3, "alice", 1000.0, &[], &[]),
            employee_model(4, "Carl", 1000.0, &[], &[]),
        ];

        let draft = generate(&employees, &[], &months(&[1]), period(2024, 1)).unwrap();
        let names: Vec<&str> = draft
            .payslips
            .iter()
            .map(|s| s.employee_name.as_str())
            .collect();

        assert_eq!(names, vec!["alice", "Bob", "Carl", "zoe"]);
    }

    #[test]
    fn test_generate_sorts_accented_names_with_their_base_letter() {
        let employees = vec![
            employee_model(1, "Zoe", 1000.0, &[], &[]),
            employee_model(2, "Émile", 1000.0, &[], &[]),
            employee_model(3, "Adam", 1000.0, &[], &[]),
            employee_model(4, "émile", 1000.0, &[], &[]),
            employee_model(5, "Emile", 1000.0, &[], &[]),
            employee_model(6, "Ödön", 1000.0, &[], &[]),
        ];

        let draft = generate(&employees, &[], &months(&[1]), period(2024, 1)).unwrap();
        let names: Vec<&str> = draft
            .payslips
            .iter()
            .map(|s| s.employee_name.as_str())
            .collect();

        assert_eq!(names, vec!["Adam", "Emile", "Émile", "émile", "Ödön", "Zoe"]);
    }

    #[test]
    fn test_generate_counts_absences_of_unknown_employees() {
        // Record references an absentee id that matches a payslip subject even though
        // the absentee's own record set is empty
        let employees = vec![employee_model(7, "Gina", 5000.0, &[], &[])];
        let records = vec![overtime_model(1, 99, (2024, 5, 1), 80.0, Some(7))];

        let draft = generate(&employees, &records, &months(&[5]), period(2024, 5)).unwrap();
        assert_eq!(draft.payslips[0].absent_deduction, 80.0);
        assert_eq!(draft.payslips[0].overtime_pay, 0.0);
    }

    #[test]
    fn test_net_salary_invariant() {
        let employees = vec![
            employee_model(1, "A", 12345.5, &[100.25, 50.0], &[75.5]),
            employee_model(2, "B", 0.0, &[], &[10.0]),
            employee_model(3, "C", 7000.0, &[1.0], &[]),
        ];
        let records = vec![
            overtime_model(1, 1, (2024, 4, 1), 120.0, Some(2)),
            overtime_model(2, 3, (2024, 4, 2), 33.3, Some(1)),
            overtime_model(3, 2, (2024, 4, 3), 10.0, Some(3)),
        ];

        let draft = generate(&employees, &records, &months(&[4]), period(2024, 4)).unwrap();
        for slip in &draft.payslips {
            let expected = slip.basic_salary + slip.total_allowances + slip.overtime_pay
                - slip.total_deductions
                - slip.absent_deduction;
            assert!((slip.net_salary() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_format_draft_summary() {
        let employees = vec![employee_model(1, "Alice", 10000.0, &[500.0], &[200.0])];
        let records = vec![overtime_model(1, 1, (2024, 1, 10), 300.0, None)];
        let draft = generate(&employees, &records, &months(&[1, 2]), period(2024, 2)).unwrap();

        let summary = format_draft_summary(&draft).unwrap();
        assert!(summary.contains("February 2024"));
        assert!(summary.contains("January, February"));
        assert!(summary.contains("Alice"));
        assert!(summary.contains("10600.00"));
        assert!(summary.contains("1 payslip(s)"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long employee name", 6), "a ver…");
    }

    #[tokio::test]
    async fn test_generate_from_db_and_finalize() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 10000.0).await?;
        let bob = create_test_employee(&db, "EMP-002", "Bob", 8000.0).await?;
        create_test_overtime(&db, alice.id, (2024, 1, 15), 300.0, None).await?;
        create_test_overtime(&db, bob.id, (2024, 1, 16), 150.0, Some(alice.id)).await?;

        let draft = generate_from_db(&db, &months(&[1]), period(2024, 1)).await?;
        assert_eq!(draft.payslips.len(), 2);

        let committed = finalize(&db, draft).await?;
        assert_eq!(committed.len(), 2);
        assert!(
            committed
                .iter()
                .all(|p| p.status == PayslipStatus::Processed)
        );

        let stored = Payslip::find().all(&db).await?;
        assert_eq!(stored.len(), 2);
        let alice_slip = stored.iter().find(|p| p.employee_id == alice.id).unwrap();
        assert_eq!(alice_slip.overtime_pay, 300.0);
        assert_eq!(alice_slip.absent_deduction, 150.0);
        assert_eq!(alice_slip.month, 1);
        assert_eq!(alice_slip.year, 2024);

        Ok(())
    }

    #[tokio::test]
    async fn test_generate_from_db_rejects_empty_months() -> Result<()> {
        let db = setup_test_db().await?;

        let result = generate_from_db(&db, &BTreeSet::new(), period(2024, 1)).await;
        assert!(matches!(result, Err(Error::NoSourceMonths)));

        Ok(())
    }

    #[tokio::test]
    async fn test_finalize_replaces_same_period_only() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 10000.0).await?;

        // January and February already processed
        let jan = generate_from_db(&db, &months(&[1]), period(2024, 1)).await?;
        finalize(&db, jan).await?;
        let feb = generate_from_db(&db, &months(&[2]), period(2024, 2)).await?;
        finalize(&db, feb).await?;

        // New overtime, January is reprocessed
        create_test_overtime(&db, alice.id, (2024, 1, 20), 400.0, None).await?;
        let jan_again = generate_from_db(&db, &months(&[1]), period(2024, 1)).await?;
        finalize(&db, jan_again).await?;

        let stored = Payslip::find().all(&db).await?;
        assert_eq!(stored.len(), 2);

        let jan_slips: Vec<_> = stored.iter().filter(|p| p.month == 1).collect();
        assert_eq!(jan_slips.len(), 1);
        assert_eq!(jan_slips[0].overtime_pay, 400.0);

        let feb_slips: Vec<_> = stored.iter().filter(|p| p.month == 2).collect();
        assert_eq!(feb_slips.len(), 1);
        assert_eq!(feb_slips[0].overtime_pay, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_finalize_rejects_draft_with_removed_employee() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 10000.0).await?;
        let bob = create_test_employee(&db, "EMP-002", "Bob", 8000.0).await?;
        process_test_period(&db, 2024, 1).await?;

        let draft = generate_from_db(&db, &months(&[1]), period(2024, 1)).await?;
        delete_employee(&db, alice.id).await?;

        let result = finalize(&db, draft).await;
        match result {
            Err(err @ Error::Validation { .. }) => {
                assert!(err.is_user_error());
                assert!(err.to_string().contains("Alice"));
            }
            other => panic!("expected a validation error, got {other:?}"),
        }

        // Bob's January payslip from the first run is still there
        let stored = Payslip::find().all(&db).await?;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].employee_id, bob.id);

        // A fresh draft goes through
        let committed = process_test_period(&db, 2024, 1).await?;
        assert_eq!(committed.len(), 1);

        Ok(())
    }
}
