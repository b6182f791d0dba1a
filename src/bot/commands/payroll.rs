//! Salary processing Discord commands.
//!
//! `/payroll process` builds a draft for the calling user and keeps it in memory;
//! the other subcommands act on that draft. Finalizing consumes it.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, remove_finalized_draft, send_block, send_file},
        core::{
            export::{self, PayslipRow},
            payroll::{self, PayrollDraft},
            period::{PayPeriod, parse_month, parse_month_list},
            report::format_money,
            settings,
            webhook::{self, WebhookReportType},
        },
        errors::{Error, Result},
    };
    use chrono::{Datelike, Local};
    use tracing::info;

    const NO_DRAFT: &str =
        "ℹ️ You have no salary draft. Run `/payroll process` first.";

    async fn current_draft(ctx: poise::Context<'_, BotData, Error>) -> Option<PayrollDraft> {
        let drafts = ctx.data().drafts.lock().await;
        drafts.get(&ctx.author().id.get()).cloned()
    }

    /// Parent command for salary processing.
    #[poise::command(
        slash_command,
        subcommands(
            "payroll_process",
            "payroll_finalize",
            "payroll_discard",
            "payroll_export",
            "payroll_print",
            "payroll_mirror"
        )
    )]
    pub async fn payroll(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Salary processing command. Available subcommands:\n\
            `/payroll process` - Build draft payslips from one or more months of overtime\n\
            `/payroll finalize` - Commit your draft to the ledger\n\
            `/payroll discard` - Throw your draft away\n\
            `/payroll export` - Download the draft as CSV\n\
            `/payroll print` - Printable salary sheet of the draft\n\
            `/payroll mirror` - Send the draft to the spreadsheet webhook";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Builds draft payslips for every employee.
    ///
    /// Overtime pay and absence deductions are summed over the source months of
    /// the chosen year; the payslips are filed under the finalization month.
    #[poise::command(slash_command, rename = "process")]
    pub async fn payroll_process(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Source months of overtime, e.g. '1,2' or 'jan feb'"] source_months: String,
        #[description = "Month the payslips are filed under (default current)"]
        #[autocomplete = "autocomplete::autocomplete_month"]
        month: Option<String>,
        #[description = "Year (default current)"] year: Option<i32>,
    ) -> Result<()> {
        ctx.defer().await?;

        let db = &ctx.data().database;
        let today = Local::now().date_naive();

        let months = parse_month_list(&source_months)?;
        let target_month = match month.as_deref() {
            Some(text) => parse_month(text)?,
            None => today.month(),
        };
        let period = PayPeriod::new(year.unwrap_or_else(|| today.year()), target_month)?;

        let draft = payroll::generate_from_db(db, &months, period).await?;
        if draft.payslips.is_empty() {
            ctx.say("👥 The roster is empty; there is nothing to process.")
                .await?;
            return Ok(());
        }

        let summary = payroll::format_draft_summary(&draft)?;
        let heading = format!(
            "🧾 **Draft for {}** - review, then `/payroll finalize`",
            draft.period
        );

        ctx.data()
            .drafts
            .lock()
            .await
            .insert(ctx.author().id.get(), draft);

        send_block(ctx, &heading, &summary, "salary_draft.txt").await
    }

    /// Commits the draft, replacing any payslips already filed for its month.
    #[poise::command(slash_command, rename = "finalize")]
    pub async fn payroll_finalize(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(draft) = current_draft(ctx).await else {
            ctx.say(NO_DRAFT).await?;
            return Ok(());
        };

        let db = &ctx.data().database;
        let period = draft.period;
        let generated_at = draft.generated_at;
        let total = draft.total_net_salary();
        let committed = payroll::finalize(db, draft).await?;

        let mut drafts = ctx.data().drafts.lock().await;
        remove_finalized_draft(&mut drafts, ctx.author().id.get(), generated_at);
        drop(drafts);

        info!(
            "User {} finalized {} payslips for {period}",
            ctx.author().name,
            committed.len()
        );
        ctx.say(format!(
            "✅ Finalized {} payslip(s) for **{period}**. Total net salary: {}",
            committed.len(),
            format_money(total)
        ))
        .await?;
        Ok(())
    }

    /// Discards the draft without saving anything.
    #[poise::command(slash_command, rename = "discard")]
    pub async fn payroll_discard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let removed = ctx
            .data()
            .drafts
            .lock()
            .await
            .remove(&ctx.author().id.get());

        match removed {
            Some(draft) => {
                ctx.say(format!("🗑️ Draft for {} discarded.", draft.period))
                    .await?;
            }
            None => {
                ctx.say(NO_DRAFT).await?;
            }
        }
        Ok(())
    }

    /// Downloads the draft as a CSV file.
    #[poise::command(slash_command, rename = "export")]
    pub async fn payroll_export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(draft) = current_draft(ctx).await else {
            ctx.say(NO_DRAFT).await?;
            return Ok(());
        };

        let csv = export::processing_csv(&draft)?;
        let file_name = format!(
            "salary_processing_{}_{}.csv",
            draft.period.month_name().to_lowercase(),
            draft.period.year
        );
        send_file(
            ctx,
            &format!("📄 Salary processing export for {}", draft.period),
            csv,
            &file_name,
        )
        .await
    }

    /// Shows the draft as a printable salary sheet.
    #[poise::command(slash_command, rename = "print")]
    pub async fn payroll_print(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(draft) = current_draft(ctx).await else {
            ctx.say(NO_DRAFT).await?;
            return Ok(());
        };
        if draft.payslips.is_empty() {
            return Err(Error::NothingToExport);
        }

        let title = format!(
            "Salary Sheet - {} (overtime from {})",
            draft.period,
            draft.source_month_names()
        );
        let rows = PayslipRow::from_draft_all(&draft);
        let sheet = export::render_print_sheet(&ctx.data().config.company, &title, &rows)?;

        send_block(ctx, "🖨️ **Salary sheet**", &sheet, "salary_sheet.txt").await
    }

    /// Sends the draft to the configured spreadsheet webhook.
    #[poise::command(slash_command, rename = "mirror")]
    pub async fn payroll_mirror(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(draft) = current_draft(ctx).await else {
            ctx.say(NO_DRAFT).await?;
            return Ok(());
        };

        let db = &ctx.data().database;
        let settings = settings::load_settings(db).await?;
        let payload = webhook::build_payload(
            WebhookReportType::SalaryProcessingReport,
            draft.period,
            PayslipRow::from_draft_all(&draft),
        );

        ctx.defer().await?;
        webhook::mirror(&ctx.data().http, &settings, &payload).await?;

        ctx.say(format!(
            "📤 Sent {} draft payslip(s) for {} to the spreadsheet.",
            payload.data.len(),
            draft.period
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
