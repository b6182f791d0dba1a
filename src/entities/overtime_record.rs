//! Overtime record entity - One logged overtime shift.
//!
//! The acting employee earns `total_amount`. When the shift covered for somebody
//! else's absence, `absent_employee_id` names that person and the same amount is
//! deducted from their pay for the month of `date`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Overtime record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "overtime_records")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee who worked the overtime
    pub employee_id: i64,
    /// Day the overtime was worked
    pub date: Date,
    /// Hours worked
    pub hours: f64,
    /// Computed pay for the shift
    pub total_amount: f64,
    /// Employee whose absence this shift covered, if any
    pub absent_employee_id: Option<i64>,
    /// Display name of the absentee (kept after the absentee is deleted)
    pub absent_employee_name: Option<String>,
    /// When the record was logged
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `OvertimeRecord` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to the acting employee
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
    /// Whether the record falls in the given calendar month
    #[must_use]
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        use chrono::Datelike;
        self.date.year() == year && self.date.month() == month
    }
}
