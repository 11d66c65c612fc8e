//! Confirmation prompt with a non-interactive fallback

use super::context::UiContext;
use crate::error::{LayeredError, LayeredResult};

/// Ask for confirmation.
///
/// Returns `true` under `--yes`, and `default` when nobody can answer.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> LayeredResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on stdin
    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| LayeredError::User(format!("Prompt task failed: {}", e)))?;

    result.map_err(|e| LayeredError::User(format!("Prompt failed: {}", e)))
}
