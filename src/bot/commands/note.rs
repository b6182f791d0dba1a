//! HR note Discord commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::note as notes,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Parent command for HR notes.
    #[poise::command(slash_command, subcommands("note_add", "note_list", "note_delete"))]
    pub async fn note(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Note command. Available subcommands:\n\
            `/note add` - Write a note\n\
            `/note list` - Show all notes, newest first\n\
            `/note delete` - Remove a note by id";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Writes a note.
    #[poise::command(slash_command, rename = "add")]
    pub async fn note_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Title"] title: String,
        #[description = "Text"] content: Option<String>,
    ) -> Result<()> {
        let created = notes::create_note(
            &ctx.data().database,
            &title,
            content.as_deref().unwrap_or_default(),
        )
        .await?;

        ctx.say(format!("📝 Note #{} saved: **{}**", created.id, created.title))
            .await?;
        Ok(())
    }

    /// Lists all notes, newest first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn note_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let all = notes::get_all_notes(&ctx.data().database).await?;

        if all.is_empty() {
            ctx.say("📝 No notes yet.").await?;
            return Ok(());
        }

        let mut response = String::from("📝 **Notes**\n\n");
        for note in &all {
            writeln!(
                &mut response,
                "`#{}` {} **{}**",
                note.id,
                note.created_at.format("%Y-%m-%d"),
                note.title
            )?;
            if !note.content.is_empty() {
                writeln!(&mut response, "> {}", note.content)?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Deletes a note by id.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn note_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Note id (shown by /note list)"] id: i64,
    ) -> Result<()> {
        notes::delete_note(&ctx.data().database, id).await?;
        ctx.say(format!("🗑️ Note #{id} deleted.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
