use serenity::all::{Context, Message};

use crate::{
    bot::command::{self, CommandContext},
    state::AppState,
};

/// Command group names accepted after the prefix.
const ROOT_COMMANDS: [&str; 2] = ["do", "discoops"];

/// Handle message creation in a channel
///
/// Ignores bots, direct messages and anything not starting with `<prefix>do` or
/// `<prefix>discoops`. Command failures are answered in the channel with
/// `AppError::user_message`.
pub async fn handle_message(state: &AppState, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }
    let Some(guild_id) = message.guild_id else {
        return;
    };
    let Some(args) = strip_command(&state.command_prefix, &message.content) else {
        return;
    };

    tracing::debug!(
        "Command from {} in guild {}: {}",
        message.author.id,
        guild_id,
        args
    );

    state
        .log
        .append(&format!(
            "{} ({}) ran `{}` in guild {}",
            message.author.name, message.author.id, args, guild_id
        ))
        .await;

    let cc = CommandContext {
        ctx: &ctx,
        msg: &message,
        state,
        guild_id: guild_id.get(),
    };

    if let Err(e) = command::dispatch(&cc, args).await {
        let reply = e.user_message();
        if let Err(send_err) = message.channel_id.say(&ctx.http, reply).await {
            tracing::error!(
                "Failed to report command error in channel {}: {}",
                message.channel_id,
                send_err
            );
        }
    }
}

/// Returns the arguments after `<prefix>do` / `<prefix>discoops`, or `None` if the
/// message is not a command.
fn strip_command<'a>(prefix: &str, content: &'a str) -> Option<&'a str> {
    let rest = content.trim_start().strip_prefix(prefix)?;

    ROOT_COMMANDS.iter().find_map(|root| {
        let after = rest.strip_prefix(root)?;
        if after.is_empty() || after.starts_with(char::is_whitespace) {
            Some(after.trim())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_and_root() {
        assert_eq!(strip_command("!", "!do members new 7 days"), Some("members new 7 days"));
        assert_eq!(strip_command("!", "!discoops help"), Some("help"));
        assert_eq!(strip_command("!", "!do"), Some(""));
    }

    #[test]
    fn ignores_other_messages() {
        assert_eq!(strip_command("!", "hello"), None);
        assert_eq!(strip_command("!", "!dothis"), None);
        assert_eq!(strip_command("?", "!do help"), None);
    }
}
