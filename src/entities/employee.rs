//! Employee entity - One row per person on the factory roster.
//!
//! Allowances and deductions are ordered lists of labelled amounts stored as JSON
//! columns, so an employee row carries its whole monthly pay structure.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single labelled allowance or deduction line (e.g. "Transport", 500.0)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayComponent {
    /// Display label of the line
    pub label: String,
    /// Monthly amount
    pub amount: f64,
}

/// Ordered list of pay components, persisted as a JSON column
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PayComponents(pub Vec<PayComponent>);

impl PayComponents {
    /// Sum of all component amounts; `0.0` when there are none
    #[must_use]
    pub fn total(&self) -> f64 {
        // Fold from +0.0: an empty `f64` sum is -0.0
        self.0.iter().fold(0.0, |acc, c| acc + c.amount)
    }

    /// Number of components
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no components
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Employee database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Internal identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// External employee code printed on badges and payslips (e.g. "EMP-001")
    #[sea_orm(unique)]
    pub employee_code: String,
    /// Display name, also the payslip sort key
    pub name: String,
    /// Department (e.g. "Production")
    pub department: String,
    /// Job title (e.g. "Machine Operator")
    pub designation: String,
    /// Optional photo reference
    pub photo_url: Option<String>,
    /// Monthly basic salary
    pub basic_salary: f64,
    /// Monthly allowances
    pub allowances: PayComponents,
    /// Monthly deductions
    pub deductions: PayComponents,
    /// When the employee was added
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Employee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One employee has many overtime records as the acting worker
    #[sea_orm(has_many = "super::overtime_record::Entity")]
    OvertimeRecords,
    /// One employee has many payslips
    #[sea_orm(has_many = "super::payslip::Entity")]
    Payslips,
}

impl Related<super::overtime_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OvertimeRecords.def()
    }
}

impl Related<super::payslip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payslips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Total of the current monthly allowances
    #[must_use]
    pub fn total_allowances(&self) -> f64 {
        self.allowances.total()
    }

    /// Total of the current monthly deductions
    #[must_use]
    pub fn total_deductions(&self) -> f64 {
        self.deductions.total()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_pay_components_total() {
        let components = PayComponents(vec![
            PayComponent {
                label: "Transport".to_string(),
                amount: 300.0,
            },
            PayComponent {
                label: "Meal".to_string(),
                amount: 200.0,
            },
        ]);
        assert_eq!(components.total(), 500.0);
        assert_eq!(components.len(), 2);
        assert!(PayComponents::default().is_empty());
        assert_eq!(PayComponents::default().total(), 0.0);
    }

    #[test]
    fn test_empty_total_is_positive_zero() {
        let total = PayComponents::default().total();
        assert!(total.is_sign_positive());
        assert_eq!(format!("{total:.2}"), "0.00");
    }
}
