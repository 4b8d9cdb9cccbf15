use rand::Rng;
use serenity::all::{EditRole, GuildId, RoleId, UserId};

use crate::{
    error::{discord_status, AppError},
    model::external_event::ExternalEvent,
    service::event_role::{event_role_name, plan_role_sync, EventRoleService},
    util::text::truncate_chars,
};

use super::{discord_time, members, split_word, CommandContext};

const LIST_DESCRIPTION_CHARS: usize = 200;
const INFO_DESCRIPTION_CHARS: usize = 1024;
/// Most interested users listed by `event info`.
const MAX_INTERESTED: usize = 50;

#[derive(Debug, PartialEq, Eq)]
enum EventCommand<'a> {
    List,
    Info(&'a str),
    Role(&'a str),
}

/// Maps `do event ...` arguments to a subcommand and its remaining arguments.
fn route(args: &str) -> EventCommand<'_> {
    let (sub, rest) = split_word(args);
    match sub.to_lowercase().as_str() {
        "" | "list" => EventCommand::List,
        "info" | "members" => EventCommand::Info(rest),
        "role" => EventCommand::Role(rest),
        // `do event <name>` is shorthand for `do event info <name>`
        _ => EventCommand::Info(args.trim()),
    }
}

pub async fn run(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    match route(args) {
        EventCommand::List => list(cc).await,
        EventCommand::Info(name) => info(cc, name).await,
        EventCommand::Role(rest) => role(cc, rest).await,
    }
}

async fn list(cc: &CommandContext<'_>) -> Result<(), AppError> {
    let mut events = cc.state.workflow.calendar().list(cc.guild_id).await?;
    if events.is_empty() {
        cc.reply("No scheduled events found in this server.").await?;
        return Ok(());
    }
    events.sort_by_key(|e| e.start);

    let sections: Vec<String> = events
        .iter()
        .map(|event| {
            let mut section = format!(
                "## `{}`\n{}\n> **Interested**: {}",
                event.name,
                summary_lines(event),
                event.user_count.unwrap_or_default()
            );
            if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
                section.push_str(&format!(
                    "\n> {}",
                    truncate_chars(description, LIST_DESCRIPTION_CHARS).replace('\n', "\n> ")
                ));
            }
            section.push_str(&format!(
                "\n**Quick:** `{}do event \"{}\"`",
                cc.state.command_prefix, event.name
            ));
            section
        })
        .collect();
    let header = format!("# Scheduled Events\n**Total:** {}", events.len());

    cc.reply_paged(&sections, Some(&header), None).await
}

async fn info(cc: &CommandContext<'_>, query: &str) -> Result<(), AppError> {
    let event = find_event(cc, query).await?;
    let interested = cc
        .state
        .workflow
        .calendar()
        .interested_users(cc.guild_id, event.id)
        .await?;
    let role = EventRoleService::new(&cc.state.store)
        .tracked_role(cc.guild_id, event.id)
        .await?;

    let mut overview = format!(
        "{}\n> **Interested**: {}",
        summary_lines(&event),
        interested.len()
    );
    if let Some(creator) = event.creator_id {
        overview.push_str(&format!("\n> **Creator**: <@{}>", creator));
    }
    match role {
        Some(role_id) => overview.push_str(&format!("\n> **Role**: <@&{}>", role_id)),
        None => overview.push_str(&format!(
            "\n> **Role**: none, create one with `{}do event role create \"{}\"`",
            cc.state.command_prefix, event.name
        )),
    }

    let mut sections = vec![overview];
    if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
        sections.push(format!(
            "## Description\n{}",
            truncate_chars(description, INFO_DESCRIPTION_CHARS)
        ));
    }

    let names = display_names(cc, &interested);
    let lines: Vec<String> = interested
        .iter()
        .zip(names)
        .take(MAX_INTERESTED)
        .enumerate()
        .map(|(i, (id, name))| match name {
            Some(name) => format!("{}. <@{}> ({})", i + 1, id, name),
            None => format!("{}. <@{}>", i + 1, id),
        })
        .collect();
    sections.extend(members::numbered_sections("Interested Members", &lines));

    let header = format!("# `{}`", event.name);
    let footer = (interested.len() > MAX_INTERESTED)
        .then(|| format!("Showing first {} of {} interested members", MAX_INTERESTED, interested.len()));

    cc.reply_paged(&sections, Some(&header), footer.as_deref())
        .await
}

async fn role(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let (action, name) = split_word(args);
    let action = action.to_lowercase();
    if !matches!(action.as_str(), "create" | "sync" | "delete") {
        return Err(AppError::BadRequest(
            "Action must be 'create', 'sync', or 'delete'".to_string(),
        ));
    }
    let event = find_event(cc, name).await?;

    match action.as_str() {
        "create" => create_role(cc, &event).await,
        "sync" => sync_role(cc, &event).await,
        _ => delete_role(cc, &event).await,
    }
}

async fn create_role(cc: &CommandContext<'_>, event: &ExternalEvent) -> Result<(), AppError> {
    let guild_id = GuildId::new(cc.guild_id);
    let roles = EventRoleService::new(&cc.state.store);

    if let Some(role_id) = roles.tracked_role(cc.guild_id, event.id).await? {
        if role_exists(cc, role_id).await? {
            cc.reply(format!("Role already exists: <@&{}>", role_id)).await?;
            return Ok(());
        }
    }

    let reason = format!("Event role created by {}", cc.msg.author.name);
    let colour: u32 = rand::rng().random_range(0..=0xFFFFFF);
    let role = guild_id
        .create_role(
            &cc.ctx.http,
            EditRole::new()
                .name(event_role_name(&event.name))
                .colour(colour)
                .mentionable(true)
                .audit_log_reason(&reason),
        )
        .await?;
    roles.track(cc.guild_id, event.id, role.id.get()).await?;

    let interested = cc
        .state
        .workflow
        .calendar()
        .interested_users(cc.guild_id, event.id)
        .await?;
    let mut added = 0;
    for user in interested {
        match cc
            .ctx
            .http
            .add_member_role(guild_id, UserId::new(user), role.id, Some(&reason))
            .await
        {
            Ok(()) => added += 1,
            Err(e) => tracing::warn!("Failed to add role {} to user {}: {}", role.id, user, e),
        }
    }

    cc.state
        .log
        .append(&format!(
            "Created role {} for event '{}' in guild {}",
            role.id, event.name, cc.guild_id
        ))
        .await;
    cc.reply(format!(
        "✅ Created role <@&{}> and added to {} interested members",
        role.id, added
    ))
    .await?;

    Ok(())
}

async fn sync_role(cc: &CommandContext<'_>, event: &ExternalEvent) -> Result<(), AppError> {
    let guild_id = GuildId::new(cc.guild_id);
    let roles = EventRoleService::new(&cc.state.store);

    let Some(role_id) = roles.tracked_role(cc.guild_id, event.id).await? else {
        cc.reply(format!(
            "No role exists for event **{}**. Use `create` first.",
            event.name
        ))
        .await?;
        return Ok(());
    };
    if !role_exists(cc, role_id).await? {
        roles.untrack(cc.guild_id, event.id).await?;
        cc.reply(format!("Role no longer exists for event **{}**", event.name))
            .await?;
        return Ok(());
    }

    let role = RoleId::new(role_id);
    let holders: Vec<u64> = members::guild_members(cc)
        .await?
        .iter()
        .filter(|m| m.roles.contains(&role))
        .map(|m| m.user.id.get())
        .collect();
    let interested = cc
        .state
        .workflow
        .calendar()
        .interested_users(cc.guild_id, event.id)
        .await?;
    let plan = plan_role_sync(&holders, &interested);

    let reason = format!("Event role sync by {}", cc.msg.author.name);
    let mut added = 0;
    for user in &plan.to_add {
        match cc
            .ctx
            .http
            .add_member_role(guild_id, UserId::new(*user), role, Some(&reason))
            .await
        {
            Ok(()) => added += 1,
            Err(e) => tracing::warn!("Failed to add role {} to user {}: {}", role, user, e),
        }
    }
    let mut removed = 0;
    for user in &plan.to_remove {
        match cc
            .ctx
            .http
            .remove_member_role(guild_id, UserId::new(*user), role, Some(&reason))
            .await
        {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("Failed to remove role {} from user {}: {}", role, user, e),
        }
    }

    cc.state
        .log
        .append(&format!(
            "Synced role {} for event '{}': +{} -{}",
            role, event.name, added, removed
        ))
        .await;
    cc.reply(format!(
        "✅ Sync complete for <@&{}>!\nAdded: {} members\nRemoved: {} members",
        role, added, removed
    ))
    .await?;

    Ok(())
}

async fn delete_role(cc: &CommandContext<'_>, event: &ExternalEvent) -> Result<(), AppError> {
    let roles = EventRoleService::new(&cc.state.store);

    let Some(role_id) = roles.tracked_role(cc.guild_id, event.id).await? else {
        cc.reply(format!("No role exists for event **{}**", event.name))
            .await?;
        return Ok(());
    };

    match GuildId::new(cc.guild_id)
        .delete_role(&cc.ctx.http, RoleId::new(role_id))
        .await
    {
        Ok(()) => {}
        // Already deleted by hand; only the mapping is left to drop
        Err(e) if discord_status(&e) == Some(404) => {}
        Err(e) => return Err(e.into()),
    }
    roles.untrack(cc.guild_id, event.id).await?;

    cc.state
        .log
        .append(&format!(
            "Deleted role {} for event '{}' in guild {}",
            role_id, event.name, cc.guild_id
        ))
        .await;
    cc.reply(format!("✅ Deleted role for event **{}**", event.name))
        .await?;

    Ok(())
}

async fn find_event(cc: &CommandContext<'_>, query: &str) -> Result<ExternalEvent, AppError> {
    if query.trim().is_empty() {
        return Err(AppError::BadRequest(format!(
            "Give an event name. Use `{}do event list` to see all events.",
            cc.state.command_prefix
        )));
    }

    match cc.state.workflow.find_external_event(cc.guild_id, query).await {
        Err(AppError::NotFound(_)) => Err(AppError::NotFound(format!(
            "Event '{}' not found. Use `{}do event list` to see all events.",
            query.trim(),
            cc.state.command_prefix
        ))),
        other => other,
    }
}

async fn role_exists(cc: &CommandContext<'_>, role_id: u64) -> Result<bool, AppError> {
    let roles = GuildId::new(cc.guild_id).roles(&cc.ctx.http).await?;

    Ok(roles.contains_key(&RoleId::new(role_id)))
}

/// Cached display names of `ids`, in order.
fn display_names(cc: &CommandContext<'_>, ids: &[u64]) -> Vec<Option<String>> {
    let guild = cc.ctx.cache.guild(GuildId::new(cc.guild_id));

    ids.iter()
        .map(|id| {
            guild
                .as_ref()
                .and_then(|g| g.members.get(&UserId::new(*id)))
                .map(|m| m.display_name().to_string())
        })
        .collect()
}

/// Status, schedule and location quote lines.
fn summary_lines(event: &ExternalEvent) -> String {
    let (emoji, label) = event.status.badge();
    let mut lines = format!(
        "> **Status**: {} {}\n> **Start**: {}",
        emoji,
        label,
        discord_time(event.start)
    );
    if let Some(end) = event.end {
        lines.push_str(&format!("\n> **End**: {}", discord_time(end)));
    }
    if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
        lines.push_str(&format!("\n> **Location**: {}", location));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{route, EventCommand};

    #[test]
    fn members_alias_routes_to_info_without_keyword() {
        assert_eq!(route("members Fleet Op"), EventCommand::Info("Fleet Op"));
        assert_eq!(route("info Fleet Op"), EventCommand::Info("Fleet Op"));
    }

    #[test]
    fn bare_name_is_info_shorthand() {
        assert_eq!(route("Fleet Op"), EventCommand::Info("Fleet Op"));
        assert_eq!(route(""), EventCommand::List);
        assert_eq!(route("ROLE sync Fleet Op"), EventCommand::Role("sync Fleet Op"));
    }
}
