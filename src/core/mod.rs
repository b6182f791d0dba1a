//! Core business logic - framework-agnostic payroll, roster, overtime and reporting
//! operations. Nothing in here knows about Discord; the bot layer formats what these
//! functions return.

/// Employee roster management
pub mod employee;
/// CSV export and printable sheets
pub mod export;
/// Finalized payslip ledger
pub mod ledger;
/// HR office notes
pub mod note;
/// Overtime ledger and overtime pay calculation
pub mod overtime;
/// Salary processing: draft generation and finalization
pub mod payroll;
/// Calendar month a payslip is filed under
pub mod period;
/// Salary report queries over the ledger
pub mod report;
/// Payroll settings document
pub mod settings;
/// Whole-state snapshots and cascading employee removal
pub mod state;
/// Spreadsheet mirroring through webhooks
pub mod webhook;
