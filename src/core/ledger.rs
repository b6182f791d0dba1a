//! Payslip ledger repository.
//!
//! The ledger holds at most one payslip per (employee, month, year). Its only
//! mutation is [`replace_period`], which removes a whole period and inserts the
//! new batch inside a single database transaction so no reader ever sees the
//! period half-replaced.

use crate::{
    core::{payroll::DraftPayslip, period::PayPeriod},
    entities::{Payslip, payslip, payslip::PayslipStatus},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::info;

/// Replaces every payslip filed under `period` with `batch`.
///
/// The batch must contain processed payslips only, with at most one payslip per
/// employee. Payslips of other periods are never touched.
pub async fn replace_period(
    db: &DatabaseConnection,
    period: PayPeriod,
    batch: &[DraftPayslip],
) -> Result<Vec<payslip::Model>> {
    crate::core::period::validate_month(period.month)?;
    validate_batch(batch)?;

    let txn = db.begin().await?;

    let removed = Payslip::delete_many()
        .filter(payslip::Column::Month.eq(period.month))
        .filter(payslip::Column::Year.eq(period.year))
        .exec(&txn)
        .await?
        .rows_affected;

    let now = Utc::now();
    let mut inserted = Vec::with_capacity(batch.len());
    for slip in batch {
        let row = payslip::ActiveModel {
            employee_id: Set(slip.employee_id),
            employee_name: Set(slip.employee_name.clone()),
            month: Set(period.month),
            year: Set(period.year),
            basic_salary: Set(slip.basic_salary),
            total_allowances: Set(slip.total_allowances),
            total_deductions: Set(slip.total_deductions),
            overtime_pay: Set(slip.overtime_pay),
            absent_deduction: Set(slip.absent_deduction),
            status: Set(slip.status),
            processed_at: Set(now),
            ..Default::default()
        };
        inserted.push(row.insert(&txn).await?);
    }

    txn.commit().await?;

    info!(
        "Ledger period {period} replaced: {removed} removed, {} inserted",
        inserted.len()
    );
    Ok(inserted)
}

fn validate_batch(batch: &[DraftPayslip]) -> Result<()> {
    let mut seen = HashSet::with_capacity(batch.len());
    for slip in batch {
        if slip.status != PayslipStatus::Processed {
            return Err(Error::InvalidBatch {
                message: format!(
                    "payslip for '{}' is {}, only processed payslips enter the ledger",
                    slip.employee_name, slip.status
                ),
            });
        }
        if !seen.insert(slip.employee_id) {
            return Err(Error::InvalidBatch {
                message: format!(
                    "employee '{}' appears more than once in the batch",
                    slip.employee_name
                ),
            });
        }
    }
    Ok(())
}

/// Retrieves every payslip in the ledger, newest period first.
pub async fn get_all_payslips<C>(db: &C) -> Result<Vec<payslip::Model>>
where
    C: ConnectionTrait,
{
    Payslip::find()
        .order_by_desc(payslip::Column::Year)
        .order_by_desc(payslip::Column::Month)
        .order_by_asc(payslip::Column::EmployeeName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the payslips filed under one period, ordered by employee name.
pub async fn get_payslips_for_period(
    db: &DatabaseConnection,
    period: PayPeriod,
) -> Result<Vec<payslip::Model>> {
    Payslip::find()
        .filter(payslip::Column::Month.eq(period.month))
        .filter(payslip::Column::Year.eq(period.year))
        .order_by_asc(payslip::Column::EmployeeName)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn processed(employee_id: i64, name: &str, overtime: f64) -> DraftPayslip {
        DraftPayslip {
            employee_id,
            employee_code: format!("EMP-{employee_id:03}"),
            employee_name: name.to_string(),
            department: "Production".to_string(),
            basic_salary: 1000.0,
            total_allowances: 0.0,
            total_deductions: 0.0,
            overtime_pay: overtime,
            absent_deduction: 0.0,
            status: PayslipStatus::Processed,
        }
    }

    #[tokio::test]
    async fn test_replace_period_inserts_batch() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 1000.0).await?;
        let period = PayPeriod::new(2024, 6)?;

        let inserted =
            replace_period(&db, period, &[processed(alice.id, "Alice", 50.0)]).await?;

        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].month, 6);
        assert_eq!(inserted[0].year, 2024);
        assert_eq!(inserted[0].net_salary(), 1050.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_period_leaves_other_periods() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 1000.0).await?;
        let bob = create_test_employee(&db, "EMP-002", "Bob", 1000.0).await?;

        let may = PayPeriod::new(2024, 5)?;
        let june = PayPeriod::new(2024, 6)?;
        let june_last_year = PayPeriod::new(2023, 6)?;

        replace_period(&db, may, &[processed(alice.id, "Alice", 1.0)]).await?;
        replace_period(&db, june_last_year, &[processed(alice.id, "Alice", 2.0)]).await?;
        replace_period(
            &db,
            june,
            &[
                processed(alice.id, "Alice", 3.0),
                processed(bob.id, "Bob", 4.0),
            ],
        )
        .await?;

        // Replace June with a single payslip
        replace_period(&db, june, &[processed(bob.id, "Bob", 5.0)]).await?;

        let june_slips = get_payslips_for_period(&db, june).await?;
        assert_eq!(june_slips.len(), 1);
        assert_eq!(june_slips[0].employee_id, bob.id);
        assert_eq!(june_slips[0].overtime_pay, 5.0);

        assert_eq!(get_payslips_for_period(&db, may).await?.len(), 1);
        assert_eq!(get_payslips_for_period(&db, june_last_year).await?.len(), 1);
        assert_eq!(get_all_payslips(&db).await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_period_with_empty_batch_clears_period() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 1000.0).await?;
        let period = PayPeriod::new(2024, 1)?;

        replace_period(&db, period, &[processed(alice.id, "Alice", 0.0)]).await?;
        replace_period(&db, period, &[]).await?;

        assert!(get_payslips_for_period(&db, period).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_period_rejects_pending_payslips() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 1000.0).await?;
        let period = PayPeriod::new(2024, 1)?;

        replace_period(&db, period, &[processed(alice.id, "Alice", 10.0)]).await?;

        let mut pending = processed(alice.id, "Alice", 20.0);
        pending.status = PayslipStatus::Pending;
        let result = replace_period(&db, period, &[pending]).await;
        assert!(matches!(result, Err(Error::InvalidBatch { .. })));

        // The existing period is untouched
        let slips = get_payslips_for_period(&db, period).await?;
        assert_eq!(slips.len(), 1);
        assert_eq!(slips[0].overtime_pay, 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_period_rejects_duplicate_employee() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 1000.0).await?;
        let period = PayPeriod::new(2024, 1)?;

        let result = replace_period(
            &db,
            period,
            &[
                processed(alice.id, "Alice", 1.0),
                processed(alice.id, "Alice", 2.0),
            ],
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidBatch { .. })));
        assert!(get_all_payslips(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_payslips_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 1000.0).await?;

        for (year, month) in [(2023, 12), (2024, 2), (2024, 1)] {
            replace_period(
                &db,
                PayPeriod::new(year, month)?,
                &[processed(alice.id, "Alice", 0.0)],
            )
            .await?;
        }

        let periods: Vec<(i32, u32)> = get_all_payslips(&db)
            .await?
            .into_iter()
            .map(|p| (p.year, p.month))
            .collect();
        assert_eq!(periods, vec![(2024, 2), (2024, 1), (2023, 12)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_period_rolls_back_when_an_insert_fails() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "EMP-001", "Alice", 1000.0).await?;
        let bob = create_test_employee(&db, "EMP-002", "Bob", 1000.0).await?;
        let period = PayPeriod::new(2024, 3)?;

        replace_period(
            &db,
            period,
            &[
                processed(alice.id, "Alice", 10.0),
                processed(bob.id, "Bob", 20.0),
            ],
        )
        .await?;

        // The last row references no employee and fails on insert, after the
        // delete and the first insert already ran
        let result = replace_period(
            &db,
            period,
            &[
                processed(alice.id, "Alice", 99.0),
                processed(9999, "Ghost", 99.0),
            ],
        )
        .await;
        assert!(matches!(result, Err(Error::Database(_))));

        let slips = get_payslips_for_period(&db, period).await?;
        assert_eq!(slips.len(), 2);
        assert_eq!(slips[0].employee_name, "Alice");
        assert_eq!(slips[0].overtime_pay, 10.0);
        assert_eq!(slips[1].employee_name, "Bob");
        assert_eq!(slips[1].overtime_pay, 20.0);

        Ok(())
    }
}
