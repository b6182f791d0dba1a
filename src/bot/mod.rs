//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the payroll bot, including all
//! slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (employee, overtime, payroll, report, settings, note, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::app::AppConfig,
    core::payroll::PayrollDraft,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Discord caps message content at 2000 characters
const MESSAGE_LIMIT: usize = 1900;

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// HTTP client for webhook mirroring
    pub http: reqwest::Client,
    /// Letterhead and seed configuration
    pub config: Arc<AppConfig>,
    /// Unfinalized salary processing drafts, keyed by Discord user id
    pub drafts: Mutex<HashMap<u64, PayrollDraft>>,
}

impl BotData {
    /// Creates the shared context for all commands.
    #[must_use]
    pub fn new(database: DatabaseConnection, http: reqwest::Client, config: Arc<AppConfig>) -> Self {
        Self {
            database,
            http,
            config,
            drafts: Mutex::new(HashMap::new()),
        }
    }
}

/// Removes `user_id`'s draft if it is still the one generated at `generated_at`.
///
/// A draft replaced by a newer `/payroll process` while the older one was being
/// finalized is kept. Returns whether a draft was removed.
pub fn remove_finalized_draft(
    drafts: &mut HashMap<u64, PayrollDraft>,
    user_id: u64,
    generated_at: DateTime<Utc>,
) -> bool {
    let is_current = drafts
        .get(&user_id)
        .is_some_and(|draft| draft.generated_at == generated_at);
    if is_current {
        drafts.remove(&user_id);
    }
    is_current
}

/// Replies with `text` in a code block, or as a file attachment when it is too
/// long for one message.
pub async fn send_block(
    ctx: poise::Context<'_, BotData, Error>,
    heading: &str,
    text: &str,
    file_name: &str,
) -> Result<()> {
    let reply = if text.len() + heading.len() <= MESSAGE_LIMIT {
        poise::CreateReply::default().content(format!("{heading}\n```\n{text}\n```"))
    } else {
        poise::CreateReply::default()
            .content(format!("{heading}\n_(too long to display, attached as a file)_"))
            .attachment(serenity::CreateAttachment::bytes(
                text.as_bytes().to_vec(),
                file_name,
            ))
    };
    ctx.send(reply).await?;
    Ok(())
}

/// Replies with a file attachment.
pub async fn send_file(
    ctx: poise::Context<'_, BotData, Error>,
    message: &str,
    contents: String,
    file_name: &str,
) -> Result<()> {
    ctx.send(
        poise::CreateReply::default()
            .content(message)
            .attachment(serenity::CreateAttachment::bytes(
                contents.into_bytes(),
                file_name,
            )),
    )
    .await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let message = if error.is_user_error() {
                warn!("Command `{}` rejected input: {error}", ctx.command().name);
                format!("❌ {error}")
            } else if matches!(error, Error::Webhook { .. }) {
                warn!("Command `{}` could not mirror: {error}", ctx.command().name);
                format!("⚠️ {error}")
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ An error occurred while processing the command.".to_string()
            };

            if let Err(e) = ctx
                .send(poise::CreateReply::default().content(message).ephemeral(true))
                .await
            {
                error!("Failed to send error message: {e}");
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Registers all commands and runs the Discord client until it stops.
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
    http: reqwest::Client,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::employee(),
                commands::overtime(),
                commands::payroll(),
                commands::report(),
                commands::settings(),
                commands::note(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands", framework.options().commands.len());
                Ok(BotData::new(database, http, config))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Starting Discord client");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;

    Ok(())
}

pub use commands::*;
pub use handlers::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{payroll, period::PayPeriod};
    use crate::test_utils::employee_model;
    use chrono::Duration;
    use std::collections::BTreeSet;

    fn draft() -> PayrollDraft {
        let employees = vec![employee_model(1, "Alice", 1000.0, &[], &[])];
        let months: BTreeSet<u32> = [1].into_iter().collect();
        payroll::generate(&employees, &[], &months, PayPeriod::new(2024, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_remove_finalized_draft() {
        let finalized = draft();
        let mut drafts = HashMap::from([(7, finalized.clone())]);

        assert!(remove_finalized_draft(&mut drafts, 7, finalized.generated_at));
        assert!(drafts.is_empty());
        assert!(!remove_finalized_draft(&mut drafts, 7, finalized.generated_at));
    }

    #[test]
    fn test_newer_draft_survives_finalizing_an_older_one() {
        let finalized = draft();
        let mut newer = draft();
        newer.generated_at = finalized.generated_at + Duration::seconds(5);
        let mut drafts = HashMap::from([(7, newer.clone())]);

        assert!(!remove_finalized_draft(&mut drafts, 7, finalized.generated_at));
        assert_eq!(drafts[&7].generated_at, newer.generated_at);
    }
}
