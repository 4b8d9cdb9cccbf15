//! Ready event handler for bot initialization.

use serenity::all::{ActivityData, Context, Ready};

use crate::state::AppState;

/// Handles the ready event when the bot connects to Discord.
///
/// Logs the connection, sets the activity to the help command and records the start in
/// the operator log.
///
/// # Arguments
/// - `state` - Shared state holding the log sink and command prefix
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &AppState, ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord ({} guilds)",
        ready.user.name,
        ready.guilds.len()
    );

    ctx.set_activity(Some(ActivityData::listening(format!(
        "{}do help",
        state.command_prefix
    ))));

    state
        .log
        .append(&format!(
            "Connected as {} to {} guild(s)",
            ready.user.name,
            ready.guilds.len()
        ))
        .await;
}
