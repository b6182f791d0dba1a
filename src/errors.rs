//! Unified error type for the payroll bot.
//!
//! User-input problems (empty month selection, bad amounts, nothing to export) get
//! their own variants so the bot layer can answer them inline. Integration
//! failures (webhook) are separate from infrastructure failures (database, I/O).

use thiserror::Error;

/// Every error the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A user-supplied value failed validation
    #[error("Invalid input: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Salary processing was requested without any source month
    #[error("Select at least one month to process")]
    NoSourceMonths,

    /// A month number outside 1..=12
    #[error("Invalid month: {month} (expected 1-12)")]
    InvalidMonth {
        /// The rejected month number
        month: u32,
    },

    /// A monetary amount or hour count that is negative, zero where not allowed, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// No employee matches the given reference
    #[error("Employee not found: {reference}")]
    EmployeeNotFound {
        /// Id, code or name used in the lookup
        reference: String,
    },

    /// Another employee already uses this code
    #[error("Employee code already in use: {code}")]
    DuplicateEmployeeCode {
        /// The duplicated code
        code: String,
    },

    /// No overtime record with this id
    #[error("Overtime record not found: {id}")]
    OvertimeNotFound {
        /// Record id
        id: i64,
    },

    /// No note with this id
    #[error("Note not found: {id}")]
    NoteNotFound {
        /// Note id
        id: i64,
    },

    /// A payslip batch that cannot be committed as one period
    #[error("Invalid payslip batch: {message}")]
    InvalidBatch {
        /// Why the batch was rejected
        message: String,
    },

    /// Export requested on an empty table
    #[error("No data to export")]
    NothingToExport,

    /// Mirroring requested but no webhook URL is configured
    #[error("No webhook URL configured. Set one with `/settings update webhook_url:<url>`")]
    WebhookNotConfigured,

    /// The webhook endpoint could not be reached
    #[error("Webhook delivery failed: {message}")]
    Webhook {
        /// Transport error description
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Formatting into a `String` failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Webhook {
            message: value.to_string(),
        }
    }
}

impl Error {
    /// Whether this error was caused by user input rather than by the system.
    ///
    /// The bot answers these inline without logging them as failures.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NoSourceMonths
                | Self::InvalidMonth { .. }
                | Self::InvalidAmount { .. }
                | Self::EmployeeNotFound { .. }
                | Self::DuplicateEmployeeCode { .. }
                | Self::OvertimeNotFound { .. }
                | Self::NoteNotFound { .. }
                | Self::InvalidBatch { .. }
                | Self::NothingToExport
                | Self::WebhookNotConfigured
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_are_classified() {
        assert!(Error::NoSourceMonths.is_user_error());
        assert!(Error::NothingToExport.is_user_error());
        assert!(Error::WebhookNotConfigured.is_user_error());
        assert!(Error::InvalidMonth { month: 13 }.is_user_error());
    }

    #[test]
    fn test_integration_errors_are_not_user_errors() {
        let err = Error::Webhook {
            message: "connection refused".to_string(),
        };
        assert!(!err.is_user_error());
        assert!(!Error::Database(sea_orm::DbErr::Custom("boom".to_string())).is_user_error());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidMonth { month: 0 }.to_string(),
            "Invalid month: 0 (expected 1-12)"
        );
        assert_eq!(
            Error::NoSourceMonths.to_string(),
            "Select at least one month to process"
        );
    }
}
