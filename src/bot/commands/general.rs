//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let company = &ctx.data().config.company.name;
        let help_text = format!(
            "**{company} Payroll Help**\n\
        Here is a summary of all available commands.\n\n\
        **Salary Processing**\n\
        • `/payroll process <months> <month> <year>` - Builds draft payslips from the overtime of the source months (e.g. `1,2`).\n\
        • `/payroll finalize` - Commits your draft, replacing any payslips of that month.\n\
        • `/payroll export|print|mirror` - CSV file, printable sheet, or spreadsheet webhook for the draft.\n\
        • `/payroll discard` - Throws the draft away.\n\n\
        **Reports**\n\
        • `/report salary [year] [month] [name]` - Finalized payslips, newest first, with the net total.\n\
        • `/report export|print|mirror` - Same filters, as CSV, printable sheet, or webhook.\n\n\
        **Roster & Overtime**\n\
        • `/employee <subcommand>` - add, list, info, update, allowance, deduction, remove_component, delete.\n\
        • `/overtime log|list|delete` - Record overtime shifts, optionally covering an absent colleague.\n\n\
        **Office**\n\
        • `/settings show|update` - Overtime rate and webhook settings.\n\
        • `/note add|list|delete` - HR notes.\n\
        • `/ping` - Checks if the bot is responsive."
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
