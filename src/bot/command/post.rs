//! `do post`: published event posts, interest and role signups.
//!
//! Any member may list, inspect, register interest and sign up. Deleting a post
//! requires Manage Server.

use crate::{
    error::AppError,
    model::event_post::{format_schedule, PublishedPost},
    service::event_workflow::RoleChoice,
};

use super::{split_word, CommandContext};

pub async fn run(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let (sub, rest) = split_word(args);
    match sub.to_lowercase().as_str() {
        "" | "list" => list(cc).await,
        "info" => info(cc, rest).await,
        "interest" | "interested" => interest(cc, rest).await,
        "signup" | "join" => signup(cc, rest).await,
        "withdraw" | "leave" => withdraw(cc, rest).await,
        "delete" => {
            cc.require_manage_guild().await?;
            delete(cc, rest).await
        }
        other => Err(AppError::BadRequest(format!(
            "Unknown post command `{}`. Use `{}do help` for the post commands.",
            other, cc.state.command_prefix
        ))),
    }
}

async fn list(cc: &CommandContext<'_>) -> Result<(), AppError> {
    let posts = cc.state.workflow.list_posts(cc.guild_id).await?;
    if posts.is_empty() {
        cc.reply("No published event posts in this server.").await?;
        return Ok(());
    }

    let sections: Vec<String> = posts
        .iter()
        .map(|post| {
            let mut section = format!(
                "## `{}`\n> **ID**: `{}`\n> **Channel**: <#{}>",
                post.title, post.id, post.channel_id
            );
            if let Some(schedule) = format_schedule(post.start, post.end) {
                section.push_str(&format!("\n> {}", schedule));
            }
            section.push_str(&format!(
                "\n> **Interested**: {}  •  **Signed up**: {}",
                post.interested.len(),
                post.signups.len()
            ));
            section
        })
        .collect();
    let header = format!("# Event Posts\n**Total:** {}", posts.len());

    cc.reply_paged(&sections, Some(&header), None).await
}

async fn info(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let post = cc
        .state
        .workflow
        .get_post(cc.guild_id, post_id(args)?)
        .await?;

    let mut reply = post.render_markdown();
    reply.push_str(&format!(
        "\n\nSign up with `{}do post signup {} <role>`",
        cc.state.command_prefix, post.id
    ));
    cc.reply_paged(&[reply], None, None).await
}

async fn interest(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let (interested, post) = cc
        .state
        .workflow
        .toggle_interest(cc.guild_id, post_id(args)?, cc.author_id())
        .await?;

    let reply = if interested {
        format!(
            "⭐ You are interested in **{}** ({} interested).",
            post.title,
            post.interested.len()
        )
    } else {
        format!("You are no longer interested in **{}**.", post.title)
    };
    cc.reply(reply).await?;

    Ok(())
}

async fn signup(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let (id, role) = split_word(args);
    if id.is_empty() || role.is_empty() {
        return Err(AppError::BadRequest(
            "Usage: `post signup <post id> <role>`".to_string(),
        ));
    }

    let signup = cc
        .state
        .workflow
        .choose_role(
            cc.guild_id,
            id,
            cc.author_id(),
            RoleChoice::Role(role.to_string()),
        )
        .await?;

    let Some(role) = &signup.role else {
        return Ok(());
    };
    let mut reply = format!("✅ Signed up as **{}** for **{}**.", role.label(), signup.post.title);
    if let Some(previous) = signup.previous.as_deref().filter(|p| *p != role.id) {
        reply.push_str(&format!(" (was {})", role_label(&signup.post, previous)));
    }
    cc.reply(reply).await?;

    Ok(())
}

async fn withdraw(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let signup = cc
        .state
        .workflow
        .choose_role(cc.guild_id, post_id(args)?, cc.author_id(), RoleChoice::Withdraw)
        .await?;

    let reply = match signup.previous.as_deref() {
        Some(previous) => format!(
            "👋 Withdrew from **{}** for **{}**.",
            role_label(&signup.post, previous),
            signup.post.title
        ),
        None => format!("You were not signed up for **{}**.", signup.post.title),
    };
    cc.reply(reply).await?;

    Ok(())
}

async fn delete(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let post = cc
        .state
        .workflow
        .delete_post(cc.guild_id, post_id(args)?, cc.author_id())
        .await?;

    cc.reply(format!("🗑️ Deleted post `{}` (**{}**).", post.id, post.title))
        .await?;

    Ok(())
}

fn post_id(args: &str) -> Result<&str, AppError> {
    let (id, _) = split_word(args);
    if id.is_empty() {
        return Err(AppError::BadRequest(
            "Give a post ID. Use `post list` to see them.".to_string(),
        ));
    }
    Ok(id)
}

/// Label of a role by ID, falling back to the raw ID for roles no longer on the post.
fn role_label(post: &PublishedPost, role_id: &str) -> String {
    post.role(role_id)
        .map(|r| r.label())
        .unwrap_or_else(|| format!("`{}`", role_id))
}
