//! Salary report Discord commands over the finalized payslip ledger.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, send_block, send_file},
        core::{
            export::{self, PayslipRow},
            period::{PayPeriod, parse_month},
            report::{self as salary_report, ReportFilter, SalaryReport, format_money},
            settings,
            webhook::{self, WebhookReportType},
        },
        errors::{Error, Result},
    };
    use chrono::{Datelike, Local};
    use std::fmt::Write;

    /// Most payslips listed inline by `/report salary`
    const INLINE_LIMIT: usize = 25;

    async fn load_report(
        ctx: poise::Context<'_, BotData, Error>,
        year: Option<i32>,
        month: Option<String>,
        name: Option<String>,
    ) -> Result<SalaryReport> {
        let month = month.as_deref().map(parse_month).transpose()?;
        let filter = ReportFilter { year, month, name };
        salary_report::generate_salary_report(&ctx.data().database, filter).await
    }

    /// Parent command for salary reports.
    #[poise::command(
        slash_command,
        subcommands("report_salary", "report_export", "report_print", "report_mirror")
    )]
    pub async fn report(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Salary report command. All subcommands take optional year, month and name filters:\n\
            `/report salary` - Finalized payslips, newest first, with the net total\n\
            `/report export` - Download as CSV\n\
            `/report print` - Printable salary sheet\n\
            `/report mirror` - Send to the spreadsheet webhook";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows finalized payslips matching the filters.
    #[poise::command(slash_command, rename = "salary")]
    pub async fn report_salary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Year"] year: Option<i32>,
        #[description = "Month (number or name)"]
        #[autocomplete = "autocomplete::autocomplete_month"]
        month: Option<String>,
        #[description = "Part of an employee name"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        name: Option<String>,
    ) -> Result<()> {
        let report = load_report(ctx, year, month, name).await?;

        if report.payslips.is_empty() {
            ctx.say(format!(
                "📊 No finalized payslips for {}.",
                report.filter.describe()
            ))
            .await?;
            return Ok(());
        }

        let mut response = format!(
            "📊 **Salary Report** - {} ({} payslips)\n\n",
            report.filter.describe(),
            report.payslips.len()
        );
        for slip in report.payslips.iter().take(INLINE_LIMIT) {
            writeln!(
                &mut response,
                "• {} {} - **{}**: gross {} / net **{}**",
                crate::core::period::month_name(slip.month),
                slip.year,
                slip.employee_name,
                format_money(slip.gross_salary()),
                format_money(slip.net_salary())
            )?;
        }
        if report.payslips.len() > INLINE_LIMIT {
            writeln!(
                &mut response,
                "_…and {} more; use `/report export` for the full list_",
                report.payslips.len() - INLINE_LIMIT
            )?;
        }
        write!(
            &mut response,
            "\n💰 **Total net salary:** {}",
            format_money(report.total_net_salary)
        )?;

        ctx.say(response).await?;
        Ok(())
    }

    /// Downloads the matching payslips as CSV.
    #[poise::command(slash_command, rename = "export")]
    pub async fn report_export(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Year"] year: Option<i32>,
        #[description = "Month (number or name)"]
        #[autocomplete = "autocomplete::autocomplete_month"]
        month: Option<String>,
        #[description = "Part of an employee name"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        name: Option<String>,
    ) -> Result<()> {
        let report = load_report(ctx, year, month, name).await?;
        let csv = export::report_csv(&report.payslips)?;

        send_file(
            ctx,
            &format!("📄 Salary report export - {}", report.filter.describe()),
            csv,
            "salary_report.csv",
        )
        .await
    }

    /// Shows the matching payslips as a printable salary sheet.
    #[poise::command(slash_command, rename = "print")]
    pub async fn report_print(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Year"] year: Option<i32>,
        #[description = "Month (number or name)"]
        #[autocomplete = "autocomplete::autocomplete_month"]
        month: Option<String>,
        #[description = "Part of an employee name"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        name: Option<String>,
    ) -> Result<()> {
        let report = load_report(ctx, year, month, name).await?;
        if report.payslips.is_empty() {
            return Err(Error::NothingToExport);
        }

        let rows: Vec<PayslipRow> = report.payslips.iter().map(PayslipRow::from).collect();
        let title = format!("Salary Report - {}", report.filter.describe());
        let sheet = export::render_print_sheet(&ctx.data().config.company, &title, &rows)?;

        send_block(ctx, "🖨️ **Salary report**", &sheet, "salary_report.txt").await
    }

    /// Sends the matching payslips to the configured spreadsheet webhook.
    ///
    /// The payload is labelled with the filtered month and year, defaulting to
    /// the current ones when a filter is not given.
    #[poise::command(slash_command, rename = "mirror")]
    pub async fn report_mirror(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Year"] year: Option<i32>,
        #[description = "Month (number or name)"]
        #[autocomplete = "autocomplete::autocomplete_month"]
        month: Option<String>,
        #[description = "Part of an employee name"]
        #[autocomplete = "autocomplete::autocomplete_employee_name"]
        name: Option<String>,
    ) -> Result<()> {
        let report = load_report(ctx, year, month, name).await?;
        if report.payslips.is_empty() {
            return Err(Error::NothingToExport);
        }

        let today = Local::now().date_naive();
        let period = PayPeriod::new(
            report.filter.year.unwrap_or_else(|| today.year()),
            report.filter.month.unwrap_or_else(|| today.month()),
        )?;

        let settings = settings::load_settings(&ctx.data().database).await?;
        let rows = report.payslips.iter().map(PayslipRow::from).collect();
        let payload = webhook::build_payload(WebhookReportType::SalaryReport, period, rows);

        ctx.defer().await?;
        webhook::mirror(&ctx.data().http, &settings, &payload).await?;

        ctx.say(format!(
            "📤 Sent {} payslip(s) ({}) to the spreadsheet.",
            payload.data.len(),
            report.filter.describe()
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
