use chrono::Utc;
use serenity::all::{GuildId, Member, RoleId};

use crate::{
    error::AppError,
    model::guild::MemberSummary,
    service::member::{join_cutoff, recent_members},
    util::{parse::parse_mention_id, text::find_by_name},
};

use super::{split_word, CommandContext};

/// Most role holders listed.
const MAX_ROLE_MEMBERS: usize = 50;
const LINES_PER_SECTION: usize = 20;

pub async fn run(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let (sub, rest) = split_word(args);
    match sub.to_lowercase().as_str() {
        "new" => new_members(cc, rest).await,
        "role" => role_members(cc, rest).await,
        _ => Err(AppError::BadRequest(format!(
            "Usage: `{p}do members new <amount> <days|weeks|months>` or `{p}do members role <role>`",
            p = cc.state.command_prefix
        ))),
    }
}

async fn new_members(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let (amount, unit) = split_word(args);
    let amount: i64 = amount.parse().map_err(|_| {
        AppError::BadRequest("Usage: `members new <amount> <days|weeks|months>`".to_string())
    })?;
    let unit = unit.to_lowercase();
    let cutoff = join_cutoff(amount, &unit, Utc::now())?;

    let members = guild_members(cc).await?;
    if members.is_empty() {
        return Err(AppError::NotFound(
            "I couldn't access the member list. Ensure **Server Members Intent** is enabled."
                .to_string(),
        ));
    }

    let summaries = members.iter().map(summarize).collect();
    let recent = recent_members(summaries, cutoff);
    if recent.total == 0 {
        cc.reply(format!("No members joined in the last {} {}.", amount, unit))
            .await?;
        return Ok(());
    }

    let sections: Vec<String> = recent
        .shown
        .iter()
        .map(|m| {
            let joined = m.joined_at.map(|t| t.timestamp()).unwrap_or_default();
            format!(
                "## `{name}`\n> **Member**: <@{id}> ({name})\n> **ID**: `{id}`\n> **Joined**: <t:{joined}:F> • <t:{joined}:R>",
                name = m.display_name,
                id = m.id,
                joined = joined
            )
        })
        .collect();
    let header = format!(
        "# New Members\n**Range:** last **{} {}**  •  **Found:** {}",
        amount, unit, recent.total
    );
    let footer = (recent.total > recent.shown.len())
        .then(|| format!("Showing first {} of {} members", recent.shown.len(), recent.total));

    cc.reply_paged(&sections, Some(&header), footer.as_deref())
        .await
}

async fn role_members(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    if args.is_empty() {
        return Err(AppError::BadRequest("Usage: `members role <@role|name>`".to_string()));
    }

    let role = {
        let guild = cc
            .ctx
            .cache
            .guild(GuildId::new(cc.guild_id))
            .ok_or_else(|| AppError::NotFound("This server is not cached yet.".to_string()))?;
        let roles: Vec<_> = guild.roles.values().cloned().collect();
        match parse_mention_id(args) {
            Some(id) => guild.roles.get(&RoleId::new(id)).cloned(),
            None => find_by_name(&roles, args, |r| r.name.as_str()).cloned(),
        }
    }
    .ok_or_else(|| AppError::NotFound(format!("Role `{}` not found.", args)))?;

    let holders: Vec<Member> = guild_members(cc)
        .await?
        .into_iter()
        .filter(|m| m.roles.contains(&role.id))
        .collect();

    let lines: Vec<String> = holders
        .iter()
        .take(MAX_ROLE_MEMBERS)
        .enumerate()
        .map(|(i, m)| format!("{}. <@{}> ({})", i + 1, m.user.id, m.display_name()))
        .collect();

    let mut sections = numbered_sections("Members", &lines);
    sections.push(format!(
        "## Role Info\n> **Position**: {}\n> **Mentionable**: {}\n> **Color**: #{:06x}",
        role.position,
        if role.mentionable { "Yes" } else { "No" },
        role.colour.0
    ));

    let header = format!(
        "# Members with role\n**Role:** `{}`  •  **Total:** {}",
        role.name,
        holders.len()
    );
    let footer = (holders.len() > MAX_ROLE_MEMBERS)
        .then(|| format!("Showing first {} of {} members", MAX_ROLE_MEMBERS, holders.len()));

    cc.reply_paged(&sections, Some(&header), footer.as_deref())
        .await
}

/// Splits numbered lines into `## <title> a-b` sections.
pub(super) fn numbered_sections(title: &str, lines: &[String]) -> Vec<String> {
    if lines.is_empty() {
        return vec![format!("## {}\n> None", title)];
    }

    lines
        .chunks(LINES_PER_SECTION)
        .enumerate()
        .map(|(i, chunk)| {
            let first = i * LINES_PER_SECTION + 1;
            format!(
                "## {} {}-{}\n{}",
                title,
                first,
                first + chunk.len() - 1,
                chunk.join("\n")
            )
        })
        .collect()
}

/// Cached guild members, falling back to one REST page when the cache is empty.
pub(super) async fn guild_members(cc: &CommandContext<'_>) -> Result<Vec<Member>, AppError> {
    let guild_id = GuildId::new(cc.guild_id);
    let cached: Vec<Member> = cc
        .ctx
        .cache
        .guild(guild_id)
        .map(|g| g.members.values().cloned().collect())
        .unwrap_or_default();

    if !cached.is_empty() {
        return Ok(cached);
    }

    Ok(guild_id.members(&cc.ctx.http, None, None).await?)
}

fn summarize(member: &Member) -> MemberSummary {
    MemberSummary {
        id: member.user.id.get(),
        display_name: member.display_name().to_string(),
        joined_at: member.joined_at.map(|t| t.to_utc()),
    }
}
