//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the persisted collections: the employee roster, the
//! overtime ledger, the payslip ledger, notes and the key-value system state that
//! holds the settings document.

pub mod employee;
pub mod note;
pub mod overtime_record;
pub mod payslip;
pub mod system_state;

// Re-export specific types to avoid conflicts
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use note::{Column as NoteColumn, Entity as Note, Model as NoteModel};
pub use overtime_record::{
    Column as OvertimeRecordColumn, Entity as OvertimeRecord, Model as OvertimeRecordModel,
};
pub use payslip::{Column as PayslipColumn, Entity as Payslip, Model as PayslipModel};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
