//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come straight from the roster so operators can pick employees
//! without remembering exact spellings or codes.

use crate::{bot::BotData, core::employee, errors::Error};

/// Discord shows at most 25 suggestions
const MAX_SUGGESTIONS: usize = 25;

/// Suggests employee names that contain `partial` in their name or code.
///
/// Returns an empty list when the roster cannot be read.
pub async fn autocomplete_employee_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(employees) = employee::get_all_employees(db).await else {
        return Vec::new();
    };

    let partial_lower = partial.trim().to_lowercase();
    employees
        .into_iter()
        .filter(|emp| {
            emp.name.to_lowercase().contains(&partial_lower)
                || emp.employee_code.to_lowercase().contains(&partial_lower)
        })
        .map(|emp| emp.name)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggests month names matching `partial`.
#[allow(clippy::unused_async)]
pub async fn autocomplete_month(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();
    (1..=12)
        .map(crate::core::period::month_name)
        .filter(|name| name.to_lowercase().starts_with(&partial_lower))
        .map(str::to_string)
        .collect()
}
