//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs
//! without hand-written SQL. Creation is idempotent, which lets the bot call it on
//! every start against an existing database file.

use crate::entities::{Employee, Note, OvertimeRecord, Payslip, SystemState};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Database used when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/factory_payroll.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file under `data/` if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(path) = database_url
        .strip_prefix("sqlite://")
        .and_then(|rest| rest.split('?').next())
    {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let db = Database::connect(&database_url).await?;
    info!("Connected to database at {database_url}");
    Ok(db)
}

/// Creates all tables that do not exist yet.
///
/// Parents are created before the tables that reference them: employees, then
/// overtime records and payslips, then the standalone notes and system state.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut employee_table = schema.create_table_from_entity(Employee);
    let mut overtime_table = schema.create_table_from_entity(OvertimeRecord);
    let mut payslip_table = schema.create_table_from_entity(Payslip);
    let mut note_table = schema.create_table_from_entity(Note);
    let mut system_state_table = schema.create_table_from_entity(SystemState);

    db.execute(builder.build(employee_table.if_not_exists()))
        .await?;
    db.execute(builder.build(overtime_table.if_not_exists()))
        .await?;
    db.execute(builder.build(payslip_table.if_not_exists()))
        .await?;
    db.execute(builder.build(note_table.if_not_exists())).await?;
    db.execute(builder.build(system_state_table.if_not_exists()))
        .await?;

    Ok(())
}
