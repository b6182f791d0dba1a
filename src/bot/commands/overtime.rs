//! Overtime Discord commands - log, list and delete overtime shifts.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            employee as roster, overtime,
            period::{PayPeriod, parse_month},
            report::format_money,
            settings,
        },
        errors::{Error, Result},
    };
    use chrono::{Datelike, Local, NaiveDate};
    use std::collections::HashMap;
    use std::fmt::Write;

    /// Most records shown by `/overtime list`
    const LIST_LIMIT: usize = 30;

    /// Parent command for the overtime ledger.
    #[poise::command(
        slash_command,
        subcommands("overtime_log", "overtime_list", "overtime_delete")
    )]
    pub async fn overtime(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Overtime command. Available subcommands:\n\
            `/overtime log` - Record an overtime shift\n\
            `/overtime list` - Show the shifts of a month\n\
            `/overtime delete` - Remove a shift by id";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Records an overtime shift, optionally covering an absent colleague.
    #[poise::command(slash_command, rename = "log")]
    pub async fn overtime_log(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Employee who worked the overtime"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        employee: String,
        #[description = "Hours worked"] hours: f64,
        #[description = "Date worked (YYYY-MM-DD, default today)"] date: Option<String>,
        #[description = "Colleague whose absence this covered"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        absent_employee: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let date = match date.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_err(|_| Error::Validation {
                    message: format!("'{text}' is not a date in YYYY-MM-DD form"),
                })?,
            _ => Local::now().date_naive(),
        };

        let worker = roster::find_employee(db, &employee).await?;
        let absentee = match absent_employee.as_deref() {
            Some(reference) => Some(roster::find_employee(db, reference).await?),
            None => None,
        };

        let settings = settings::load_settings(db).await?;
        let record = overtime::log_overtime(
            db,
            &settings,
            worker.id,
            date,
            hours,
            absentee.as_ref().map(|a| a.id),
        )
        .await?;

        let mut response = format!(
            "⏱️ Logged {hours}h for **{}** on {date}: {} (#{})",
            worker.name,
            format_money(record.total_amount),
            record.id
        );
        if let Some(absentee) = absentee {
            write!(
                &mut response,
                "\nCovers **{}**'s absence; the same amount is deducted from their pay.",
                absentee.name
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Lists the overtime shifts of one month.
    #[poise::command(slash_command, rename = "list")]
    pub async fn overtime_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month (number or name, default current)"]
        #[autocomplete = "autocomplete::autocomplete_month"]
        month: Option<String>,
        #[description = "Year (default current)"] year: Option<i32>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let today = Local::now().date_naive();

        let month = match month.as_deref() {
            Some(text) => parse_month(text)?,
            None => today.month(),
        };
        let period = PayPeriod::new(year.unwrap_or_else(|| today.year()), month)?;

        let records = overtime::get_overtime_for_month(db, period).await?;
        if records.is_empty() {
            ctx.say(format!("⏱️ No overtime logged for {period}."))
                .await?;
            return Ok(());
        }

        let names: HashMap<i64, String> = roster::get_all_employees(db)
            .await?
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();

        let total = records.iter().fold(0.0, |acc, r| acc + r.total_amount);
        let mut response = format!("⏱️ **Overtime - {period}** ({} shifts)\n\n", records.len());
        for record in records.iter().take(LIST_LIMIT) {
            let worker = names
                .get(&record.employee_id)
                .map_or("Unknown", String::as_str);
            write!(
                &mut response,
                "`#{}` {} **{worker}** {}h = {}",
                record.id,
                record.date.format("%d %b"),
                record.hours,
                format_money(record.total_amount)
            )?;
            if let Some(absent) = &record.absent_employee_name {
                write!(&mut response, " (covering {absent})")?;
            }
            writeln!(&mut response)?;
        }
        if records.len() > LIST_LIMIT {
            writeln!(
                &mut response,
                "_…and {} more_",
                records.len() - LIST_LIMIT
            )?;
        }
        write!(&mut response, "\n**Total:** {}", format_money(total))?;

        ctx.say(response).await?;
        Ok(())
    }

    /// Deletes an overtime shift by id.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn overtime_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Record id (shown by /overtime list)"] id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        overtime::delete_overtime_record(db, id).await?;
        ctx.say(format!("🗑️ Overtime record #{id} deleted.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
