//! Payslip entity - The finalized payslip ledger.
//!
//! Gross and net salary are never stored; they are derived from the stored
//! components every time they are read so the two can never disagree.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a payslip
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PayslipStatus {
    /// Computed, not yet committed to the ledger
    #[sea_orm(string_value = "Pending")]
    Pending,
    /// Committed to the ledger
    #[sea_orm(string_value = "Processed")]
    Processed,
}

impl std::fmt::Display for PayslipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Processed => write!(f, "Processed"),
        }
    }
}

/// Payslip database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payslips")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee the payslip belongs to
    pub employee_id: i64,
    /// Employee name at the time of processing
    pub employee_name: String,
    /// Month the payslip is filed under (1-12)
    pub month: u32,
    /// Year the payslip is filed under
    pub year: i32,
    /// Monthly basic salary
    pub basic_salary: f64,
    /// Sum of allowances
    pub total_allowances: f64,
    /// Sum of deductions
    pub total_deductions: f64,
    /// Overtime pay summed over the source months
    pub overtime_pay: f64,
    /// Absence deduction summed over the source months
    pub absent_deduction: f64,
    /// Pending or Processed
    pub status: PayslipStatus,
    /// When the payslip was committed
    pub processed_at: DateTimeUtc,
}

/// Defines relationships between Payslip and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payslip belongs to one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
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
