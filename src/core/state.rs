//! Whole-state snapshots of the payroll collections.
//!
//! The roster, the overtime ledger and the payslip ledger can be loaded and saved
//! as one snapshot. Removing an employee touches all three, so it is expressed as
//! a pure function from one snapshot to the next ([`cascade_delete`]) and applied
//! with [`replace_state`] inside a single transaction.

use crate::{
    entities::{Employee, OvertimeRecord, Payslip, employee, overtime_record, payslip},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Absentee label left on overtime records whose absentee was removed from the roster
pub const DELETED_EMPLOYEE_LABEL: &str = "Deleted Employee";

/// The three payroll collections at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollState {
    /// Employee roster
    pub employees: Vec<employee::Model>,
    /// Overtime ledger
    pub overtime_records: Vec<overtime_record::Model>,
    /// Finalized payslips
    pub payslips: Vec<payslip::Model>,
}

/// Returns the state that results from removing `employee_id` from the roster.
///
/// * the employee is dropped from the roster
/// * their payslips are dropped
/// * overtime records they worked are dropped
/// * records where they were the absentee lose the reference and get
///   [`DELETED_EMPLOYEE_LABEL`] as absentee name
#[must_use]
pub fn cascade_delete(state: PayrollState, employee_id: i64) -> PayrollState {
    let employees = state
        .employees
        .into_iter()
        .filter(|e| e.id != employee_id)
        .collect();

    let payslips = state
        .payslips
        .into_iter()
        .filter(|p| p.employee_id != employee_id)
        .collect();

    let overtime_records = state
        .overtime_records
        .into_iter()
        .filter(|r| r.employee_id != employee_id)
        .map(|mut r| {
            if r.absent_employee_id == Some(employee_id) {
                r.absent_employee_id = None;
                r.absent_employee_name = Some(DELETED_EMPLOYEE_LABEL.to_string());
            }
            r
        })
        .collect();

    PayrollState {
        employees,
        overtime_records,
        payslips,
    }
}

/// Loads all three collections.
pub async fn load_state<C>(db: &C) -> Result<PayrollState>
where
    C: ConnectionTrait,
{
    let employees = Employee::find()
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await?;
    let overtime_records = OvertimeRecord::find()
        .order_by_asc(overtime_record::Column::Id)
        .all(db)
        .await?;
    let payslips = Payslip::find()
        .order_by_asc(payslip::Column::Id)
        .all(db)
        .await?;

    debug!(
        "Loaded state: {} employees, {} overtime records, {} payslips",
        employees.len(),
        overtime_records.len(),
        payslips.len()
    );

    Ok(PayrollState {
        employees,
        overtime_records,
        payslips,
    })
}

/// Overwrites all three collections with `state`, keeping every row's id.
///
/// Does not open a transaction of its own; run it on a transaction when the
/// replacement must be atomic (see [`save_state`]).
pub async fn replace_state<C>(db: &C, state: &PayrollState) -> Result<()>
where
    C: ConnectionTrait,
{
    // Children first so foreign keys never dangle
    Payslip::delete_many().exec(db).await?;
    OvertimeRecord::delete_many().exec(db).await?;
    Employee::delete_many().exec(db).await?;

    for emp in &state.employees {
        employee::ActiveModel {
            id: Set(emp.id),
            employee_code: Set(emp.employee_code.clone()),
            name: Set(emp.name.clone()),
            department: Set(emp.department.clone()),
            designation: Set(emp.designation.clone()),
            photo_url: Set(emp.photo_url.clone()),
            basic_salary: Set(emp.basic_salary),
            allowances: Set(emp.allowances.clone()),
            deductions: Set(emp.deductions.clone()),
            created_at: Set(emp.created_at),
        }
        .insert(db)
        .await?;
    }

    for record in &state.overtime_records {
        overtime_record::ActiveModel {
            id: Set(record.id),
            employee_id: Set(record.employee_id),
            date: Set(record.date),
            hours: Set(record.hours),
            total_amount: Set(record.total_amount),
            absent_employee_id: Set(record.absent_employee_id),
            absent_employee_name: Set(record.absent_employee_name.clone()),
            created_at: Set(record.created_at),
        }
        .insert(db)
        .await?;
    }

    for slip in &state.payslips {
        payslip::ActiveModel {
            id: Set(slip.id),
            employee_id: Set(slip.employee_id),
            employee_name: Set(slip.employee_name.clone()),
            month: Set(slip.month),
            year: Set(slip.year),
            basic_salary: Set(slip.basic_salary),
            total_allowances: Set(slip.total_allowances),
            total_deductions: Set(slip.total_deductions),
            overtime_pay: Set(slip.overtime_pay),
            absent_deduction: Set(slip.absent_deduction),
            status: Set(slip.status),
            processed_at: Set(slip.processed_at),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

/// Saves a full snapshot atomically.
pub async fn save_state(db: &DatabaseConnection, state: &PayrollState) -> Result<()> {
    let txn = db.begin().await?;
    replace_state(&txn, state).await?;
    txn.commit().await?;
    Ok(())
}
