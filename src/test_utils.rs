//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults. The `*_model` helpers build
//! detached models for pure functions; the `create_test_*` helpers insert rows.

use crate::{
    core::{
        employee::{self, NewEmployee},
        payroll,
        period::PayPeriod,
    },
    entities::{
        self,
        employee::{PayComponent, PayComponents},
        overtime_record,
    },
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::collections::BTreeSet;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

fn components(prefix: &str, amounts: &[f64]) -> PayComponents {
    PayComponents(
        amounts
            .iter()
            .enumerate()
            .map(|(idx, &amount)| PayComponent {
                label: format!("{prefix} {}", idx + 1),
                amount,
            })
            .collect(),
    )
}

fn test_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Builds an employee model without touching the database.
///
/// # Defaults
/// * `employee_code`: `EMP-{id:03}`
/// * `department`: "Production"
/// * component labels: "Allowance 1", "Deduction 1", ...
pub fn employee_model(
    id: i64,
    name: &str,
    basic_salary: f64,
    allowances: &[f64],
    deductions: &[f64],
) -> entities::employee::Model {
    entities::employee::Model {
        id,
        employee_code: format!("EMP-{id:03}"),
        name: name.to_string(),
        department: "Production".to_string(),
        designation: "Operator".to_string(),
        photo_url: None,
        basic_salary,
        allowances: components("Allowance", allowances),
        deductions: components("Deduction", deductions),
        created_at: Utc::now(),
    }
}

/// Builds an overtime record model of one hour worth `amount`.
pub fn overtime_model(
    id: i64,
    employee_id: i64,
    date: (i32, u32, u32),
    amount: f64,
    absent_employee_id: Option<i64>,
) -> overtime_record::Model {
    overtime_record::Model {
        id,
        employee_id,
        date: test_date(date),
        hours: 1.0,
        total_amount: amount,
        absent_employee_id,
        absent_employee_name: absent_employee_id.map(|absent| format!("Employee {absent}")),
        created_at: Utc::now(),
    }
}

/// Creates a test employee with no allowances or deductions.
///
/// # Defaults
/// * `department`: "Production"
/// * `designation`: "Operator"
pub async fn create_test_employee(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
    basic_salary: f64,
) -> Result<entities::employee::Model> {
    employee::create_employee(
        db,
        NewEmployee {
            employee_code: code.to_string(),
            name: name.to_string(),
            department: "Production".to_string(),
            designation: "Operator".to_string(),
            basic_salary,
            ..NewEmployee::default()
        },
    )
    .await
}

/// Inserts an overtime record with a fixed `amount`, bypassing the rate
/// calculation so tests control the totals directly.
pub async fn create_test_overtime(
    db: &DatabaseConnection,
    employee_id: i64,
    date: (i32, u32, u32),
    amount: f64,
    absent_employee_id: Option<i64>,
) -> Result<overtime_record::Model> {
    let absent_employee_name = match absent_employee_id {
        Some(id) => employee::get_employee_by_id(db, id).await?.map(|e| e.name),
        None => None,
    };

    let record = overtime_record::ActiveModel {
        employee_id: Set(employee_id),
        date: Set(test_date(date)),
        hours: Set(1.0),
        total_amount: Set(amount),
        absent_employee_id: Set(absent_employee_id),
        absent_employee_name: Set(absent_employee_name),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(record.insert(db).await?)
}

/// Processes `month` of `year` from its own overtime and finalizes it.
pub async fn process_test_period(
    db: &DatabaseConnection,
    year: i32,
    month: u32,
) -> Result<Vec<entities::payslip::Model>> {
    let months: BTreeSet<u32> = [month].into_iter().collect();
    let draft = payroll::generate_from_db(db, &months, PayPeriod::new(year, month)?).await?;
    payroll::finalize(db, draft).await
}
