//! Owner diagnostics: log tail, log clearing and a permissions report.

use serenity::all::{GuildId, Permissions};

use crate::{error::AppError, util::paginate::chunk_lines};

use super::CommandContext;

const DEFAULT_LOG_LINES: usize = 10;
const MAX_LOG_LINES: usize = 50;

/// Permissions the bot needs, as shown by `debug`.
const KEY_PERMISSIONS: [(&str, Permissions); 5] = [
    ("Manage Roles", Permissions::MANAGE_ROLES),
    ("Manage Guild", Permissions::MANAGE_GUILD),
    ("View Audit Log", Permissions::VIEW_AUDIT_LOG),
    ("Send Messages", Permissions::SEND_MESSAGES),
    ("Embed Links", Permissions::EMBED_LINKS),
];

/// `do logs [n]`: the last `n` log lines, clamped to 1..=50.
pub async fn logs(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    cc.require_owner().await?;
    let lines = log_line_count(args);

    let tail = cc.state.log.tail(lines).await;
    if tail.is_empty() {
        cc.reply("No logs recorded yet.").await?;
        return Ok(());
    }

    let lines: Vec<&str> = tail.lines().collect();
    let sections = chunk_lines(&lines);

    cc.reply_paged(&sections, Some("# DiscoOps Logs"), None)
        .await
}

/// `do clearlogs`: deletes the log file.
pub async fn clear_logs(cc: &CommandContext<'_>) -> Result<(), AppError> {
    cc.require_owner().await?;

    cc.state.log.clear().await;
    cc.reply("Logs cleared.").await?;
    cc.state
        .log
        .append(&format!("Logs cleared by {}", cc.msg.author.name))
        .await;

    Ok(())
}

/// `do debug`: guild, bot and permission summary.
pub async fn debug(cc: &CommandContext<'_>) -> Result<(), AppError> {
    cc.require_owner().await?;

    let (bot_id, bot_name) = {
        let user = cc.ctx.cache.current_user();
        (user.id, user.name.clone())
    };
    let guild_info = cc.ctx.cache.guild(GuildId::new(cc.guild_id)).map(|guild| {
        let permissions = guild
            .members
            .get(&bot_id)
            .map(|member| guild.member_permissions(member));
        (guild.name.clone(), guild.member_count, permissions)
    });
    let (guild_name, member_count, permissions) = guild_info
        .ok_or_else(|| AppError::NotFound("This server is not cached yet.".to_string()))?;

    let posts = cc.state.workflow.list_posts(cc.guild_id).await?.len();
    let writes = cc.state.log.writes().await;

    let mut report = format!(
        "# DiscoOps Debug\n**Guild**: {} (ID {})  •  **Members**: {}\n\n**Bot**: {} (ID {})\n\n## Key Permissions",
        guild_name, cc.guild_id, member_count, bot_name, bot_id
    );
    for (label, permission) in KEY_PERMISSIONS {
        let granted = match permissions {
            Some(p) if p.contains(permission) => "✅",
            Some(_) => "❌",
            None => "❔",
        };
        report.push_str(&format!("\n- {}: {}", label, granted));
    }
    report.push_str(&format!(
        "\n\n## Storage\n- Log file: `{}`\n- Log writes: {}\n- Published posts: {}",
        cc.state.log.path().display(),
        writes,
        posts
    ));

    cc.reply(report).await?;

    Ok(())
}

fn log_line_count(args: &str) -> usize {
    args.trim()
        .parse::<usize>()
        .unwrap_or(DEFAULT_LOG_LINES)
        .clamp(1, MAX_LOG_LINES)
}
