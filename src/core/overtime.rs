//! Overtime ledger business logic.
//!
//! An overtime shift is paid at the employee's hourly rate times the configured
//! multiplier. The hourly rate comes from either the employee's own basic salary
//! or a fixed basis amount, spread over the configured working hours per month.
//! A shift may cover for an absent colleague; the same amount then counts as that
//! colleague's absence deduction during salary processing.

use crate::{
    core::{
        employee::get_employee_by_id,
        period::PayPeriod,
        settings::{OvertimeBasis, Settings},
    },
    entities::{OvertimeRecord, employee, overtime_record},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Hourly rate for `employee` under `settings`.
#[must_use]
pub fn hourly_rate(settings: &Settings, employee: &employee::Model) -> f64 {
    let basis = match settings.overtime_basis {
        OvertimeBasis::EmployeeBasic => employee.basic_salary,
        OvertimeBasis::Fixed { amount } => amount,
    };

    let hours = settings.working_hours_per_month();
    if hours <= 0.0 {
        return 0.0;
    }
    basis / hours
}

/// Pay for `hours` of overtime, rounded to cents.
#[must_use]
pub fn overtime_amount(settings: &Settings, employee: &employee::Model, hours: f64) -> f64 {
    round_cents(hours * hourly_rate(settings, employee) * settings.overtime_multiplier)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Records an overtime shift with its computed pay.
///
/// # Errors
/// * [`Error::InvalidAmount`] when `hours` is not a positive finite number
/// * [`Error::EmployeeNotFound`] when the worker or the absentee does not exist
/// * [`Error::Validation`] when the worker is listed as their own absentee
pub async fn log_overtime(
    db: &DatabaseConnection,
    settings: &Settings,
    employee_id: i64,
    date: NaiveDate,
    hours: f64,
    absent_employee_id: Option<i64>,
) -> Result<overtime_record::Model> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(Error::InvalidAmount { amount: hours });
    }
    if absent_employee_id == Some(employee_id) {
        return Err(Error::Validation {
            message: "an employee cannot cover their own absence".to_string(),
        });
    }

    let txn = db.begin().await?;

    let worker = get_employee_by_id(&txn, employee_id)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            reference: employee_id.to_string(),
        })?;

    let absentee = match absent_employee_id {
        Some(id) => Some(get_employee_by_id(&txn, id).await?.ok_or_else(|| {
            Error::EmployeeNotFound {
                reference: id.to_string(),
            }
        })?),
        None => None,
    };

    let total_amount = overtime_amount(settings, &worker, hours);

    let record = overtime_record::ActiveModel {
        employee_id: Set(worker.id),
        date: Set(date),
        hours: Set(hours),
        total_amount: Set(total_amount),
        absent_employee_id: Set(absentee.as_ref().map(|a| a.id)),
        absent_employee_name: Set(absentee.as_ref().map(|a| a.name.clone())),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let inserted = record.insert(&txn).await?;

    txn.commit().await?;

    info!(
        "Overtime logged for {} on {date}: {hours}h = {total_amount:.2}",
        worker.name
    );
    Ok(inserted)
}

/// Retrieves every overtime record, newest date first.
pub async fn get_all_overtime_records(
    db: &DatabaseConnection,
) -> Result<Vec<overtime_record::Model>> {
    OvertimeRecord::find()
        .order_by_desc(overtime_record::Column::Date)
        .order_by_desc(overtime_record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the overtime records dated within one calendar month, oldest first.
pub async fn get_overtime_for_month(
    db: &DatabaseConnection,
    period: PayPeriod,
) -> Result<Vec<overtime_record::Model>> {
    let Some(first) = period.first_day() else {
        return Err(Error::InvalidMonth {
            month: period.month,
        });
    };
    let next = if period.month == 12 {
        NaiveDate::from_ymd_opt(period.year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(period.year, period.month + 1, 1)
    }
    .ok_or(Error::InvalidMonth {
        month: period.month,
    })?;

    OvertimeRecord::find()
        .filter(overtime_record::Column::Date.gte(first))
        .filter(overtime_record::Column::Date.lt(next))
        .order_by_asc(overtime_record::Column::Date)
        .order_by_asc(overtime_record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes one overtime record.
pub async fn delete_overtime_record(db: &DatabaseConnection, record_id: i64) -> Result<()> {
    let result = OvertimeRecord::delete_by_id(record_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::OvertimeNotFound { id: record_id });
    }
    info!("Overtime record {record_id} deleted");
    Ok(())
}
