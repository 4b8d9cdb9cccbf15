//! Text command parsing and dispatch.
//!
//! Commands arrive as `<prefix>do <group> [subcommand] [args...]`. Each group module
//! parses its own arguments, calls the service layer and replies in the invoking channel.
//! Long replies are split with `util::paginate`.

mod diagnostics;
mod division;
mod event;
mod help;
mod members;
mod post;
mod wizard;

use chrono::{DateTime, Utc};
use serenity::all::{Context, GuildId, Message, Permissions, UserId};

use crate::{
    error::AppError,
    model::event_post::MessageRef,
    state::AppState,
    util::paginate::paginate,
};

/// Everything a command needs about its invocation.
pub struct CommandContext<'a> {
    pub ctx: &'a Context,
    pub msg: &'a Message,
    pub state: &'a AppState,
    pub guild_id: u64,
}

impl CommandContext<'_> {
    pub fn author_id(&self) -> u64 {
        self.msg.author.id.get()
    }

    pub fn channel_id(&self) -> u64 {
        self.msg.channel_id.get()
    }

    /// Sends a reply and returns where it landed.
    pub async fn reply(&self, content: impl Into<String>) -> Result<MessageRef, AppError> {
        let sent = self.msg.channel_id.say(&self.ctx.http, content).await?;

        Ok(MessageRef {
            channel_id: sent.channel_id.get(),
            message_id: sent.id.get(),
        })
    }

    /// Sends sections as one or more pages under a header and footer.
    pub async fn reply_paged(
        &self,
        sections: &[String],
        header: Option<&str>,
        footer: Option<&str>,
    ) -> Result<(), AppError> {
        for page in paginate(sections, header, footer) {
            self.reply(page).await?;
        }

        Ok(())
    }

    /// Fails unless the author has Manage Server in this guild.
    pub async fn require_manage_guild(&self) -> Result<(), AppError> {
        let member = self.msg.member(self.ctx).await?;

        let permissions = self
            .ctx
            .cache
            .guild(GuildId::new(self.guild_id))
            .map(|guild| guild.member_permissions(&member));

        match permissions {
            Some(p) if p.contains(Permissions::MANAGE_GUILD) => Ok(()),
            _ => Err(AppError::BadRequest(
                "You need the **Manage Server** permission to use this command.".to_string(),
            )),
        }
    }

    /// Fails unless the author is the configured bot owner; anyone with Manage Server
    /// passes when no owner is configured.
    pub async fn require_owner(&self) -> Result<(), AppError> {
        match self.state.bot_owner_id {
            Some(owner) if UserId::new(owner) == self.msg.author.id => Ok(()),
            Some(_) => Err(AppError::BadRequest(
                "Only the bot owner can use this command.".to_string(),
            )),
            None => self.require_manage_guild().await,
        }
    }
}

/// Splits off the first whitespace-delimited word.
pub(crate) fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

/// Absolute and relative Discord timestamp tags for `at`.
pub(crate) fn discord_time(at: DateTime<Utc>) -> String {
    let unix = at.timestamp();
    format!("<t:{unix}:F> • <t:{unix}:R>")
}

/// Groups reserved for server managers. Help, post actions and owner diagnostics
/// check their own permissions.
fn needs_manage_guild(group: &str) -> bool {
    matches!(
        group,
        "members" | "member" | "events" | "event" | "wizard" | "divisions" | "division"
    )
}

/// Routes a command line (without prefix) to its group.
pub async fn dispatch(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let (group, rest) = split_word(args);

    let group = group.to_lowercase();
    if needs_manage_guild(&group) {
        cc.require_manage_guild().await?;
    }

    match group.as_str() {
        "" | "help" => help::run(cc).await,
        "members" | "member" => members::run(cc, rest).await,
        "events" | "event" => event::run(cc, rest).await,
        "wizard" => wizard::run(cc, rest).await,
        "post" | "posts" => post::run(cc, rest).await,
        "divisions" | "division" => division::run(cc, rest).await,
        "logs" => diagnostics::logs(cc, rest).await,
        "clearlogs" => diagnostics::clear_logs(cc).await,
        "debug" => diagnostics::debug(cc).await,
        other => Err(AppError::BadRequest(format!(
            "Unknown command `{}`. Use `{}do help` for the command list.",
            other, cc.state.command_prefix
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_first_word() {
        assert_eq!(split_word("  members new 7 days "), ("members", "new 7 days"));
        assert_eq!(split_word("help"), ("help", ""));
        assert_eq!(split_word(""), ("", ""));
    }

    #[test]
    fn formats_discord_timestamps() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        assert_eq!(discord_time(at), "<t:1700000000:F> • <t:1700000000:R>");
    }

    #[test]
    fn member_facing_groups_skip_manage_check() {
        assert!(needs_manage_guild("wizard"));
        assert!(needs_manage_guild("event"));
        assert!(!needs_manage_guild("post"));
        assert!(!needs_manage_guild("help"));
        assert!(!needs_manage_guild("logs"));
    }
}
