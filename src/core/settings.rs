//! Payroll settings document.
//!
//! Settings are stored as one JSON document under the `settings` key of the
//! `system_state` table and are always read and written whole. A document that no
//! longer parses is logged and replaced by the defaults rather than failing the
//! caller.

use crate::{
    entities::{SystemState, system_state},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const SETTINGS_KEY: &str = "settings";

/// Salary basis used to derive the hourly overtime rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OvertimeBasis {
    /// Use each employee's own basic salary
    EmployeeBasic,
    /// Use the same fixed monthly amount for everybody
    Fixed {
        /// Monthly amount the hourly rate is derived from
        amount: f64,
    },
}

/// Process-wide payroll configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Multiplier applied to the hourly rate for overtime hours
    pub overtime_multiplier: f64,
    /// Which salary the hourly rate is derived from
    pub overtime_basis: OvertimeBasis,
    /// Working days in a month
    pub working_days_per_month: u32,
    /// Working hours in a day
    pub working_hours_per_day: f64,
    /// Spreadsheet endpoint that receives mirrored reports
    pub webhook_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            overtime_multiplier: 2.0,
            overtime_basis: OvertimeBasis::EmployeeBasic,
            working_days_per_month: 26,
            working_hours_per_day: 8.0,
            webhook_url: None,
        }
    }
}

impl Settings {
    /// Working hours in a month (days x hours per day)
    #[must_use]
    pub fn working_hours_per_month(&self) -> f64 {
        f64::from(self.working_days_per_month) * self.working_hours_per_day
    }

    /// Checks that every number is usable in the overtime formula and that the
    /// webhook URL, when present, is an http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if !self.overtime_multiplier.is_finite() || self.overtime_multiplier <= 0.0 {
            return Err(Error::InvalidAmount {
                amount: self.overtime_multiplier,
            });
        }
        if self.working_days_per_month == 0 || self.working_days_per_month > 31 {
            return Err(Error::Validation {
                message: format!(
                    "working days per month must be between 1 and 31, got {}",
                    self.working_days_per_month
                ),
            });
        }
        if !self.working_hours_per_day.is_finite()
            || self.working_hours_per_day <= 0.0
            || self.working_hours_per_day > 24.0
        {
            return Err(Error::Validation {
                message: format!(
                    "working hours per day must be between 0 and 24, got {}",
                    self.working_hours_per_day
                ),
            });
        }
        if let OvertimeBasis::Fixed { amount } = self.overtime_basis {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidAmount { amount });
            }
        }
        if let Some(url) = &self.webhook_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(Error::Validation {
                    message: format!("webhook URL must start with http:// or https://, got '{url}'"),
                });
            }
        }
        Ok(())
    }
}

/// Loads the settings document.
///
/// Returns the defaults when no document exists yet, and also when the stored
/// document cannot be parsed (a warning is logged in that case).
pub async fn load_settings<C>(db: &C) -> Result<Settings>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(SETTINGS_KEY))
        .one(db)
        .await?;

    let Some(state) = state else {
        debug!("No stored settings, using defaults");
        return Ok(Settings::default());
    };

    match serde_json::from_str::<Settings>(&state.value) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            warn!("Stored settings are malformed, falling back to defaults: {e}");
            Ok(Settings::default())
        }
    }
}

/// Validates and stores the whole settings document, replacing any previous one.
pub async fn save_settings<C>(db: &C, settings: &Settings) -> Result<()>
where
    C: ConnectionTrait,
{
    settings.validate()?;

    let value = serde_json::to_string(settings)?;
    let now = Utc::now().naive_utc();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(SETTINGS_KEY))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(SETTINGS_KEY.to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    info!("Settings saved");
    Ok(())
}

/// Stores `initial` as the settings document unless one already exists.
///
/// Returns whether anything was written.
pub async fn seed_settings<C>(db: &C, initial: &Settings) -> Result<bool>
where
    C: ConnectionTrait,
{
    let exists = SystemState::find()
        .filter(system_state::Column::Key.eq(SETTINGS_KEY))
        .count(db)
        .await?
        > 0;

    if exists {
        return Ok(false);
    }

    save_settings(db, initial).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.working_hours_per_month(), 208.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            overtime_multiplier: 0.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidAmount { .. })
        ));

        let settings = Settings {
            working_days_per_month: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Validation { .. })));

        let settings = Settings {
            working_hours_per_day: f64::NAN,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Validation { .. })));

        let settings = Settings {
            overtime_basis: OvertimeBasis::Fixed { amount: -1.0 },
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidAmount { .. })
        ));

        let settings = Settings {
            webhook_url: Some("ftp://example.com".to_string()),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_settings_json_shape() {
        let settings = Settings {
            overtime_basis: OvertimeBasis::Fixed { amount: 12000.0 },
            ..Settings::default()
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["overtime_basis"]["kind"], "fixed");
        assert_eq!(json["overtime_basis"]["amount"], 12000.0);

        // Missing fields fall back to defaults
        let partial: Settings = serde_json::from_str(r#"{"overtime_multiplier": 1.5}"#).unwrap();
        assert_eq!(partial.overtime_multiplier, 1.5);
        assert_eq!(partial.working_days_per_month, 26);
        assert_eq!(partial.overtime_basis, OvertimeBasis::EmployeeBasic);
    }

    #[tokio::test]
    async fn test_load_settings_defaults_when_missing() -> Result<()> {
        let db = setup_test_db().await?;

        let settings = load_settings(&db).await?;
        assert_eq!(settings, Settings::default());

        Ok(())
    }

    #[tokio::test]
    async fn test_save_and_load_settings() -> Result<()> {
        let db = setup_test_db().await?;

        let settings = Settings {
            overtime_multiplier: 1.5,
            working_days_per_month: 22,
            webhook_url: Some("https://script.example.com/exec".to_string()),
            ..Settings::default()
        };
        save_settings(&db, &settings).await?;
        assert_eq!(load_settings(&db).await?, settings);

        // Saving again replaces the document instead of adding a second one
        let updated = Settings {
            overtime_multiplier: 3.0,
            ..settings
        };
        save_settings(&db, &updated).await?;
        assert_eq!(load_settings(&db).await?, updated);

        let count = SystemState::find()
            .filter(system_state::Column::Key.eq(SETTINGS_KEY))
            .count(&db)
            .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_save_settings_rejects_invalid() -> Result<()> {
        let db = setup_test_db().await?;

        let settings = Settings {
            overtime_multiplier: -2.0,
            ..Settings::default()
        };
        assert!(save_settings(&db, &settings).await.is_err());
        assert_eq!(load_settings(&db).await?, Settings::default());

        Ok(())
    }

    #[tokio::test]
    async fn test_load_settings_falls_back_on_malformed_document() -> Result<()> {
        let db = setup_test_db().await?;

        system_state::ActiveModel {
            key: Set(SETTINGS_KEY.to_string()),
            value: Set("{not json".to_string()),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let settings = load_settings(&db).await?;
        assert_eq!(settings, Settings::default());

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_settings_only_once() -> Result<()> {
        let db = setup_test_db().await?;

        let first = Settings {
            overtime_multiplier: 1.25,
            ..Settings::default()
        };
        assert!(seed_settings(&db, &first).await?);

        let second = Settings {
            overtime_multiplier: 4.0,
            ..Settings::default()
        };
        assert!(!seed_settings(&db, &second).await?);
        assert_eq!(load_settings(&db).await?.overtime_multiplier, 1.25);

        Ok(())
    }
}
