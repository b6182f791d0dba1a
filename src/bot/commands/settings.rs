//! Settings Discord commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            report::format_money,
            settings::{self as payroll_settings, OvertimeBasis, Settings},
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Salary the overtime rate is derived from, as offered in the command picker
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum BasisChoice {
        #[name = "Employee basic salary"]
        EmployeeBasic,
        #[name = "Fixed amount"]
        Fixed,
    }

    fn describe(settings: &Settings) -> Result<String> {
        let mut text = String::from("⚙️ **Payroll Settings**\n\n");
        writeln!(
            &mut text,
            "Overtime multiplier: **{}x**",
            settings.overtime_multiplier
        )?;
        let basis = match settings.overtime_basis {
            OvertimeBasis::EmployeeBasic => "each employee's basic salary".to_string(),
            OvertimeBasis::Fixed { amount } => format!("fixed {}", format_money(amount)),
        };
        writeln!(&mut text, "Overtime basis: {basis}")?;
        writeln!(
            &mut text,
            "Working time: {} days x {} hours = {} hours/month",
            settings.working_days_per_month,
            settings.working_hours_per_day,
            settings.working_hours_per_month()
        )?;
        write!(
            &mut text,
            "Spreadsheet webhook: {}",
            settings.webhook_url.as_deref().unwrap_or("_not configured_")
        )?;
        Ok(text)
    }

    /// Parent command for payroll settings.
    #[poise::command(slash_command, subcommands("settings_show", "settings_update"))]
    pub async fn settings(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Settings command. Available subcommands:\n\
            `/settings show` - Show the current settings\n\
            `/settings update` - Change one or more settings";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the current payroll settings.
    #[poise::command(slash_command, rename = "show")]
    pub async fn settings_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let current = payroll_settings::load_settings(&ctx.data().database).await?;
        ctx.say(describe(&current)?).await?;
        Ok(())
    }

    /// Changes payroll settings; omitted options keep their value.
    #[poise::command(slash_command, rename = "update")]
    pub async fn settings_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Overtime multiplier (e.g. 2.0)"] overtime_multiplier: Option<f64>,
        #[description = "Salary the hourly rate is derived from"] overtime_basis: Option<
            BasisChoice,
        >,
        #[description = "Monthly amount for the fixed basis"] fixed_amount: Option<f64>,
        #[description = "Working days per month"] working_days: Option<u32>,
        #[description = "Working hours per day"] working_hours: Option<f64>,
        #[description = "Spreadsheet webhook URL"] webhook_url: Option<String>,
        #[description = "Remove the webhook URL"] clear_webhook: Option<bool>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let mut updated = payroll_settings::load_settings(db).await?;

        if let Some(multiplier) = overtime_multiplier {
            updated.overtime_multiplier = multiplier;
        }
        match overtime_basis {
            Some(BasisChoice::EmployeeBasic) => {
                updated.overtime_basis = OvertimeBasis::EmployeeBasic;
            }
            Some(BasisChoice::Fixed) => {
                let Some(amount) = fixed_amount else {
                    return Err(Error::Validation {
                        message: "a fixed basis needs `fixed_amount`".to_string(),
                    });
                };
                updated.overtime_basis = OvertimeBasis::Fixed { amount };
            }
            None => {
                // A bare amount only adjusts an already fixed basis
                let is_fixed = matches!(updated.overtime_basis, OvertimeBasis::Fixed { .. });
                if let Some(amount) = fixed_amount.filter(|_| is_fixed) {
                    updated.overtime_basis = OvertimeBasis::Fixed { amount };
                }
            }
        }
        if let Some(days) = working_days {
            updated.working_days_per_month = days;
        }
        if let Some(hours) = working_hours {
            updated.working_hours_per_day = hours;
        }
        if let Some(url) = webhook_url {
            let trimmed = url.trim();
            updated.webhook_url = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if clear_webhook.unwrap_or(false) {
            updated.webhook_url = None;
        }

        payroll_settings::save_settings(db, &updated).await?;

        ctx.say(format!("✅ Settings saved.\n\n{}", describe(&updated)?))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
