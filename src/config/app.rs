//! Application configuration loading from config.toml
//!
//! The file carries the company letterhead used on printed sheets, optional
//! initial payroll settings and a roster used to seed an empty database. A
//! missing file is not an error; the built-in defaults are used instead.

use crate::{
    core::settings::Settings,
    entities::employee::PayComponent,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Letterhead printed on salary sheets
    pub company: CompanyConfig,
    /// Settings written to the database on first start
    pub settings: Option<Settings>,
    /// Roster seeded when the employee table is empty
    pub employees: Vec<EmployeeSeed>,
}

/// Company letterhead
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    /// Company name
    pub name: String,
    /// Postal address line
    #[serde(default)]
    pub address: Option<String>,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: "Factory Payroll".to_string(),
            address: None,
        }
    }
}

/// One employee in the seed roster
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeSeed {
    /// External employee code
    pub code: String,
    /// Display name
    pub name: String,
    /// Department
    #[serde(default)]
    pub department: String,
    /// Job title
    #[serde(default)]
    pub designation: String,
    /// Optional photo reference
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Monthly basic salary
    pub basic_salary: f64,
    /// Monthly allowances
    #[serde(default)]
    pub allowances: Vec<PayComponent>,
    /// Monthly deductions
    #[serde(default)]
    pub deductions: Vec<PayComponent>,
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if let Some(settings) = &config.settings {
        settings.validate()?;
    }
    Ok(config)
}

/// Loads configuration from `CONFIG_PATH` or `./config.toml`, falling back to
/// defaults when the file does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if !Path::new(&path).exists() {
        warn!("No configuration file at {path}, using defaults");
        return Ok(AppConfig::default());
    }

    let config = load_config(&path)?;
    info!(
        "Loaded configuration from {path} ({} seed employee(s))",
        config.employees.len()
    );
    Ok(config)
}
