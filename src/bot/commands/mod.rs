//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Employee roster commands
pub mod employee;

/// General utility commands
pub mod general;

/// HR note commands
pub mod note;

/// Overtime ledger commands
pub mod overtime;

/// Salary processing commands
pub mod payroll;

/// Salary report commands
pub mod report;

/// Settings commands
pub mod settings;

// Export commands
pub use employee::*;
pub use general::*;
pub use note::*;
pub use overtime::*;
pub use payroll::*;
pub use report::*;
pub use settings::*;
