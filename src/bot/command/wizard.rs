//! `do wizard`: build an event draft step by step and publish it.
//!
//! Every subcommand except `start` works on the author's active draft. Replies that
//! belong to the wizard are tracked on the draft so they are cleaned up when the draft
//! is published or cancelled.

use std::{collections::BTreeSet, time::Duration};

use serenity::all::{ChannelType, GuildId};

use crate::{
    error::{workflow::WorkflowError, AppError},
    model::{
        draft::{CalendarMode, DraftOptions, EventDraft},
        event_post::MessageRef,
        guild::ChannelSummary,
    },
    service::{destination::search_destinations, division::DivisionService},
    util::{paginate::MAX_MSG, parse::parse_mention_id, text::truncate_chars},
};

use super::{split_word, CommandContext};

/// How long the emoji prompt of `wizard role` waits for a reaction.
const EMOJI_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn run(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let (sub, rest) = split_word(args);
    match sub.to_lowercase().as_str() {
        "start" => start(cc, rest).await,
        "import" => import(cc, rest).await,
        "description" | "desc" => description(cc, rest).await,
        "role" => role(cc, rest).await,
        "options" => options(cc, rest).await,
        "channels" => channels(cc, rest).await,
        "publish" => publish(cc, rest).await,
        "cancel" => cancel(cc).await,
        "" | "show" => show(cc).await,
        other => Err(AppError::BadRequest(format!(
            "Unknown wizard step `{}`. Use `{}do help` for the wizard commands.",
            other, cc.state.command_prefix
        ))),
    }
}

async fn start(cc: &CommandContext<'_>, title: &str) -> Result<(), AppError> {
    let title = (!title.is_empty()).then_some(title);
    let started = cc
        .state
        .workflow
        .start_draft(cc.guild_id, cc.author_id(), cc.channel_id(), title)
        .await;

    let mut reply = format!(
        "📝 Started draft `{}` for **{}**.\nNext: `{p}do wizard import <event>` or `{p}do wizard role <division> | <name>`.",
        started.draft.id,
        started.draft.title,
        p = cc.state.command_prefix
    );
    if let Some(replaced) = &started.replaced {
        reply.push_str(&format!(
            "\n⚠️ Your previous draft `{}` was discarded.",
            replaced
        ));
    }

    track_reply(cc, &started.draft, reply).await
}

async fn import(cc: &CommandContext<'_>, query: &str) -> Result<(), AppError> {
    let draft = current_draft(cc).await?;
    if query.is_empty() {
        return Err(AppError::BadRequest(
            "Usage: `wizard import <scheduled event name>`".to_string(),
        ));
    }

    let event = cc
        .state
        .workflow
        .find_external_event(cc.guild_id, query)
        .await?;
    let draft = cc
        .state
        .workflow
        .hydrate_from_external_event(cc.author_id(), &draft.id, &event)
        .await?;

    let reply = format!(
        "📥 Imported **{}**. The draft is linked to the scheduled event and will sync back on publish.",
        draft.title
    );
    track_reply(cc, &draft, reply).await
}

async fn description(cc: &CommandContext<'_>, text: &str) -> Result<(), AppError> {
    let draft = current_draft(cc).await?;
    let draft = cc
        .state
        .workflow
        .set_description(cc.author_id(), &draft.id, text)
        .await?;

    track_reply(cc, &draft, "✏️ Description updated.".to_string()).await
}

async fn role(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let draft = current_draft(cc).await?;
    let spec = parse_role_spec(args)?;
    let division = DivisionService::new(&cc.state.store)
        .resolve(cc.guild_id, spec.division)
        .await?;

    let role = cc
        .state
        .workflow
        .add_role(
            cc.author_id(),
            &draft.id,
            &division,
            spec.name,
            spec.capacity,
            spec.description,
        )
        .await?;

    let prompt = cc
        .msg
        .channel_id
        .say(
            &cc.ctx.http,
            format!(
                "➕ Added `{}` **{}**. React to this message within {} seconds to give it an emoji.",
                role.id,
                role.label(),
                EMOJI_TIMEOUT.as_secs()
            ),
        )
        .await?;
    cc.state
        .workflow
        .track_wizard_message(
            cc.author_id(),
            &draft.id,
            MessageRef {
                channel_id: prompt.channel_id.get(),
                message_id: prompt.id.get(),
            },
        )
        .await?;

    let reaction = prompt
        .await_reaction(cc.ctx)
        .author_id(cc.msg.author.id)
        .timeout(EMOJI_TIMEOUT)
        .await;

    // No reaction leaves the role without an emoji
    if let Some(reaction) = reaction {
        let emoji = reaction.emoji.to_string();
        let draft = cc
            .state
            .workflow
            .set_role_emoji(cc.author_id(), &draft.id, &role.id, &emoji)
            .await?;
        track_reply(cc, &draft, format!("{} set for **{}**.", emoji, role.name)).await?;
    }

    Ok(())
}

async fn options(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let draft = current_draft(cc).await?;
    let options = parse_options(args)?;
    let draft = cc
        .state
        .workflow
        .set_options(cc.author_id(), &draft.id, options)
        .await?;

    let comms = if draft.comms.is_empty() {
        "none".to_string()
    } else {
        draft.comms.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    let calendar = match &draft.calendar {
        Some(link) => format!("linked to `{}`", link.snapshot.name),
        None => "unlinked".to_string(),
    };
    let reply = format!(
        "⚙️ Options updated.\n> **Comms**: {}\n> **Calendar**: {}\n> **Sync back**: {}",
        comms,
        calendar,
        if draft.sync_back { "on" } else { "off" }
    );

    track_reply(cc, &draft, reply).await
}

async fn channels(cc: &CommandContext<'_>, query: &str) -> Result<(), AppError> {
    let draft = current_draft(cc).await?;
    let candidates = text_channels(cc).await?;
    let found = search_destinations(&candidates, (!query.is_empty()).then_some(query));

    if found.channels.is_empty() {
        return track_reply(cc, &draft, "No matching text channels.".to_string()).await;
    }

    let mut reply = String::from("**Destinations**");
    for channel in &found.channels {
        reply.push_str(&format!("\n- <#{}> (`{}`)", channel.id, channel.name));
    }
    if found.total > found.channels.len() {
        reply.push_str(&format!(
            "\nShowing {} of {} channels; narrow it down with `{}do wizard channels <query>`.",
            found.channels.len(),
            found.total,
            cc.state.command_prefix
        ));
    }

    track_reply(cc, &draft, reply).await
}

async fn publish(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let draft = current_draft(cc).await?;
    let channel_id = if args.is_empty() {
        cc.channel_id()
    } else {
        let id = parse_mention_id(args).ok_or_else(|| {
            AppError::BadRequest("Usage: `wizard publish <#channel>`".to_string())
        })?;
        if !text_channels(cc).await?.iter().any(|c| c.id == id) {
            return Err(AppError::NotFound(
                "That channel is not a text channel in this server.".to_string(),
            ));
        }
        id
    };

    let post = cc
        .state
        .workflow
        .publish(cc.author_id(), &draft.id, channel_id)
        .await?;

    cc.reply(format!(
        "✅ Published **{}** to <#{}> as post `{}`.",
        post.title, channel_id, post.id
    ))
    .await?;

    Ok(())
}

async fn cancel(cc: &CommandContext<'_>) -> Result<(), AppError> {
    let draft = current_draft(cc).await?;
    let draft = cc.state.workflow.cancel(cc.author_id(), &draft.id).await?;

    cc.reply(format!("🗑️ Draft `{}` cancelled.", draft.id))
        .await?;

    Ok(())
}

async fn show(cc: &CommandContext<'_>) -> Result<(), AppError> {
    let draft = current_draft(cc).await?;

    track_reply(cc, &draft, truncate_chars(&draft.render_markdown(), MAX_MSG)).await
}

async fn current_draft(cc: &CommandContext<'_>) -> Result<EventDraft, AppError> {
    Ok(cc
        .state
        .workflow
        .active_draft(cc.author_id())
        .await
        .ok_or(WorkflowError::NoActiveDraft)?)
}

/// Replies and registers the reply for cleanup with the draft.
async fn track_reply(
    cc: &CommandContext<'_>,
    draft: &EventDraft,
    content: String,
) -> Result<(), AppError> {
    let sent = cc.reply(content).await?;
    cc.state
        .workflow
        .track_wizard_message(cc.author_id(), &draft.id, sent)
        .await
}

/// Text channels of the guild ordered by position.
async fn text_channels(cc: &CommandContext<'_>) -> Result<Vec<ChannelSummary>, AppError> {
    let mut channels: Vec<_> = GuildId::new(cc.guild_id)
        .channels(&cc.ctx.http)
        .await?
        .into_values()
        .filter(|c| c.kind == ChannelType::Text)
        .collect();
    channels.sort_by_key(|c| (c.position, c.id));

    Ok(channels
        .into_iter()
        .map(|c| ChannelSummary {
            id: c.id.get(),
            name: c.name,
        })
        .collect())
}

/// Parsed `<division> | <name> [| capacity [| description]]`.
#[derive(Debug, PartialEq, Eq)]
struct RoleSpec<'a> {
    division: &'a str,
    name: &'a str,
    capacity: Option<&'a str>,
    description: Option<&'a str>,
}

fn parse_role_spec(args: &str) -> Result<RoleSpec<'_>, AppError> {
    let mut parts = args.splitn(4, '|').map(str::trim);
    let usage = || {
        AppError::BadRequest(
            "Usage: `wizard role <division> | <name> [| capacity [| description]]`".to_string(),
        )
    };

    let division = parts.next().ok_or_else(usage)?;
    let name = parts.next().filter(|n| !n.is_empty()).ok_or_else(usage)?;
    let capacity = parts.next().filter(|c| !c.is_empty());
    let description = parts.next().filter(|d| !d.is_empty());

    Ok(RoleSpec {
        division,
        name,
        capacity,
        description,
    })
}

/// Parses `comms=a,b calendar=linked|unlinked sync=on|off`; omitted keys stay unchanged.
fn parse_options(args: &str) -> Result<DraftOptions, AppError> {
    let mut options = DraftOptions::default();

    for token in args.split_whitespace() {
        let (key, value) = token.split_once('=').ok_or_else(|| {
            AppError::BadRequest(format!("Expected `key=value`, got `{}`.", token))
        })?;

        match key.to_lowercase().as_str() {
            "comms" => {
                let comms: BTreeSet<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect();
                options.comms = Some(comms);
            }
            "calendar" => {
                options.calendar = Some(match value.to_lowercase().as_str() {
                    "linked" => CalendarMode::Linked,
                    "unlinked" => CalendarMode::Unlinked,
                    _ => {
                        return Err(AppError::BadRequest(
                            "calendar must be 'linked' or 'unlinked'.".to_string(),
                        ))
                    }
                });
            }
            "sync" => {
                options.sync_back = Some(match value.to_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => {
                        return Err(AppError::BadRequest(
                            "sync must be 'on' or 'off'.".to_string(),
                        ))
                    }
                });
            }
            other => {
                return Err(AppError::BadRequest(format!(
                    "Unknown option `{}`. Use comms, calendar or sync.",
                    other
                )))
            }
        }
    }

    if options == DraftOptions::default() {
        return Err(AppError::BadRequest(
            "Usage: `wizard options comms=a,b calendar=linked|unlinked sync=on|off`".to_string(),
        ));
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_role_spec() {
        let spec = parse_role_spec("Tanks | Main Tank | 2 | Holds aggro").unwrap();

        assert_eq!(
            spec,
            RoleSpec {
                division: "Tanks",
                name: "Main Tank",
                capacity: Some("2"),
                description: Some("Holds aggro"),
            }
        );
    }

    #[test]
    fn role_spec_needs_a_name() {
        assert!(parse_role_spec("Tanks").is_err());
        assert!(parse_role_spec("Tanks | ").is_err());
    }

    #[test]
    fn description_may_contain_pipes() {
        let spec = parse_role_spec("General | Scout | | eyes | ears").unwrap();

        assert_eq!(spec.capacity, None);
        assert_eq!(spec.description, Some("eyes | ears"));
    }

    #[test]
    fn parses_options() {
        let options = parse_options("comms=voice,text calendar=unlinked sync=off").unwrap();

        assert_eq!(
            options.comms,
            Some(BTreeSet::from(["text".to_string(), "voice".to_string()]))
        );
        assert_eq!(options.calendar, Some(CalendarMode::Unlinked));
        assert_eq!(options.sync_back, Some(false));
    }

    #[test]
    fn empty_comms_clears_them() {
        let options = parse_options("comms=").unwrap();

        assert_eq!(options.comms, Some(BTreeSet::new()));
    }

    #[test]
    fn rejects_unknown_options() {
        assert!(parse_options("colour=red").is_err());
        assert!(parse_options("sync=maybe").is_err());
        assert!(parse_options("").is_err());
    }
}
