//! Employee roster business logic.
//!
//! Provides functions for creating, looking up, editing and removing employees.
//! Removal cascades through the overtime and payslip ledgers in one transaction.

use crate::{
    config::app::EmployeeSeed,
    core::state,
    entities::{
        Employee, employee,
        employee::{PayComponent, PayComponents},
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Which list a pay component belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Added to gross pay
    Allowance,
    /// Subtracted from gross pay
    Deduction,
}

impl ComponentKind {
    /// Lowercase label used in messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Allowance => "allowance",
            Self::Deduction => "deduction",
        }
    }
}

/// Input for [`create_employee`].
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    /// External employee code
    pub employee_code: String,
    /// Display name
    pub name: String,
    /// Department
    pub department: String,
    /// Job title
    pub designation: String,
    /// Optional photo reference
    pub photo_url: Option<String>,
    /// Monthly basic salary
    pub basic_salary: f64,
    /// Monthly allowances
    pub allowances: Vec<PayComponent>,
    /// Monthly deductions
    pub deductions: Vec<PayComponent>,
}

impl From<EmployeeSeed> for NewEmployee {
    fn from(seed: EmployeeSeed) -> Self {
        Self {
            employee_code: seed.code,
            name: seed.name,
            department: seed.department,
            designation: seed.designation,
            photo_url: seed.photo_url,
            basic_salary: seed.basic_salary,
            allowances: seed.allowances,
            deductions: seed.deductions,
        }
    }
}

/// Partial update for [`update_employee`]; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    /// New display name
    pub name: Option<String>,
    /// New department
    pub department: Option<String>,
    /// New job title
    pub designation: Option<String>,
    /// New photo reference
    pub photo_url: Option<String>,
    /// New basic salary
    pub basic_salary: Option<f64>,
}

impl EmployeeUpdate {
    /// Whether no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.department.is_none()
            && self.designation.is_none()
            && self.photo_url.is_none()
            && self.basic_salary.is_none()
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn require_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

/// Retrieves all employees, ordered alphabetically by name.
pub async fn get_all_employees<C>(db: &C) -> Result<Vec<employee::Model>>
where
    C: ConnectionTrait,
{
    Employee::find()
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by internal id.
pub async fn get_employee_by_id<C>(db: &C, employee_id: i64) -> Result<Option<employee::Model>>
where
    C: ConnectionTrait,
{
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by external code.
pub async fn get_employee_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::EmployeeCode.eq(code.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by exact display name.
pub async fn get_employee_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Resolves what an operator typed (code, exact name, or case-insensitive name) to
/// an employee.
pub async fn find_employee(db: &DatabaseConnection, reference: &str) -> Result<employee::Model> {
    if let Some(emp) = get_employee_by_code(db, reference).await? {
        return Ok(emp);
    }
    if let Some(emp) = get_employee_by_name(db, reference).await? {
        return Ok(emp);
    }

    let wanted = reference.trim().to_lowercase();
    get_all_employees(db)
        .await?
        .into_iter()
        .find(|e| e.name.to_lowercase() == wanted || e.employee_code.to_lowercase() == wanted)
        .ok_or_else(|| Error::EmployeeNotFound {
            reference: reference.to_string(),
        })
}

/// Adds an employee to the roster after validating the input.
pub async fn create_employee(db: &DatabaseConnection, input: NewEmployee) -> Result<employee::Model> {
    let code = require_text(&input.employee_code, "Employee code")?;
    let name = require_text(&input.name, "Employee name")?;
    validate_amount(input.basic_salary)?;
    for component in input.allowances.iter().chain(&input.deductions) {
        require_text(&component.label, "Component label")?;
        validate_amount(component.amount)?;
    }

    if get_employee_by_code(db, &code).await?.is_some() {
        return Err(Error::DuplicateEmployeeCode { code });
    }

    let model = employee::ActiveModel {
        employee_code: Set(code),
        name: Set(name),
        department: Set(input.department.trim().to_string()),
        designation: Set(input.designation.trim().to_string()),
        photo_url: Set(input.photo_url),
        basic_salary: Set(input.basic_salary),
        allowances: Set(PayComponents(input.allowances)),
        deductions: Set(PayComponents(input.deductions)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!("Employee {} ({}) added", created.name, created.employee_code);
    Ok(created)
}

/// Applies a partial update to an employee.
pub async fn update_employee(
    db: &DatabaseConnection,
    employee_id: i64,
    update: EmployeeUpdate,
) -> Result<employee::Model> {
    let existing = get_employee_by_id(db, employee_id)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            reference: employee_id.to_string(),
        })?;

    let mut active_model: employee::ActiveModel = existing.into();

    if let Some(name) = update.name {
        active_model.name = Set(require_text(&name, "Employee name")?);
    }
    if let Some(department) = update.department {
        active_model.department = Set(department.trim().to_string());
    }
    if let Some(designation) = update.designation {
        active_model.designation = Set(designation.trim().to_string());
    }
    if let Some(photo_url) = update.photo_url {
        let trimmed = photo_url.trim();
        active_model.photo_url = Set((!trimmed.is_empty()).then(|| trimmed.to_string()));
    }
    if let Some(basic_salary) = update.basic_salary {
        validate_amount(basic_salary)?;
        active_model.basic_salary = Set(basic_salary);
    }

    let updated = active_model.update(db).await?;
    info!("Employee {} updated", updated.name);
    Ok(updated)
}

/// Appends an allowance or deduction line to an employee.
pub async fn add_pay_component(
    db: &DatabaseConnection,
    employee_id: i64,
    kind: ComponentKind,
    label: &str,
    amount: f64,
) -> Result<employee::Model> {
    let label = require_text(label, "Component label")?;
    validate_amount(amount)?;

    let existing = get_employee_by_id(db, employee_id)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            reference: employee_id.to_string(),
        })?;

    let mut components = match kind {
        ComponentKind::Allowance => existing.allowances.clone(),
        ComponentKind::Deduction => existing.deductions.clone(),
    };
    components.0.push(PayComponent { label, amount });

    let mut active_model: employee::ActiveModel = existing.into();
    match kind {
        ComponentKind::Allowance => active_model.allowances = Set(components),
        ComponentKind::Deduction => active_model.deductions = Set(components),
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Removes the first allowance or deduction line whose label matches
/// (case-insensitive).
pub async fn remove_pay_component(
    db: &DatabaseConnection,
    employee_id: i64,
    kind: ComponentKind,
    label: &str,
) -> Result<employee::Model> {
    let existing = get_employee_by_id(db, employee_id)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            reference: employee_id.to_string(),
        })?;

    let mut components = match kind {
        ComponentKind::Allowance => existing.allowances.clone(),
        ComponentKind::Deduction => existing.deductions.clone(),
    };

    let wanted = label.trim().to_lowercase();
    let Some(position) = components
        .0
        .iter()
        .position(|c| c.label.to_lowercase() == wanted)
    else {
        return Err(Error::Validation {
            message: format!("{} has no {} named '{label}'", existing.name, kind.label()),
        });
    };
    components.0.remove(position);

    let mut active_model: employee::ActiveModel = existing.into();
    match kind {
        ComponentKind::Allowance => active_model.allowances = Set(components),
        ComponentKind::Deduction => active_model.deductions = Set(components),
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Removes an employee together with their payslips and the overtime they worked.
///
/// Overtime records on which they were the absentee are kept but lose the
/// reference. All changes commit together or not at all.
pub async fn delete_employee(db: &DatabaseConnection, employee_id: i64) -> Result<employee::Model> {
    let txn = db.begin().await?;

    let snapshot = state::load_state(&txn).await?;
    let Some(removed) = snapshot
        .employees
        .iter()
        .find(|e| e.id == employee_id)
        .cloned()
    else {
        return Err(Error::EmployeeNotFound {
            reference: employee_id.to_string(),
        });
    };

    let next = state::cascade_delete(snapshot, employee_id);
    state::replace_state(&txn, &next).await?;

    txn.commit().await?;

    info!("Employee {} ({}) removed", removed.name, removed.employee_code);
    Ok(removed)
}

/// Seeds the roster from configuration when it is empty.
///
/// Returns how many employees were added.
pub async fn seed_roster(db: &DatabaseConnection, seeds: &[EmployeeSeed]) -> Result<usize> {
    let existing = Employee::find().count(db).await?;
    if existing > 0 || seeds.is_empty() {
        return Ok(0);
    }

    let mut added = 0;
    for seed in seeds {
        create_employee(db, NewEmployee::from(seed.clone())).await?;
        added += 1;
    }

    info!("Seeded roster with {added} employee(s)");
    Ok(added)
}
