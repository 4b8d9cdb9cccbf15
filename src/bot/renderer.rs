//! Embed rendering of drafts and published posts.

use std::sync::Arc;

use serenity::{
    all::{ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage, MessageId},
    async_trait,
    http::Http,
};

use crate::{
    error::AppError,
    model::{
        draft::EventDraft,
        event_post::{MessageRef, PublishedPost},
    },
    service::renderer::Renderer,
    util::text::truncate_chars,
};

/// Discord embed description limit.
const MAX_DESCRIPTION: usize = 4096;

const DRAFT_COLOR: u32 = 0x95a5a6;
const POST_COLOR: u32 = 0x3498db;

pub struct DiscordRenderer {
    http: Arc<Http>,
}

impl DiscordRenderer {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Edits `existing` when set, otherwise sends a new message to `channel_id`.
    async fn upsert_embed(
        &self,
        channel_id: u64,
        existing: Option<MessageRef>,
        embed: CreateEmbed,
    ) -> Result<MessageRef, AppError> {
        let message = match existing {
            Some(existing) => {
                ChannelId::new(existing.channel_id)
                    .edit_message(
                        &self.http,
                        MessageId::new(existing.message_id),
                        EditMessage::new().embed(embed),
                    )
                    .await?
            }
            None => {
                ChannelId::new(channel_id)
                    .send_message(&self.http, CreateMessage::new().embed(embed))
                    .await?
            }
        };

        Ok(MessageRef {
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
        })
    }
}

#[async_trait]
impl Renderer for DiscordRenderer {
    async fn render_preview(&self, draft: &EventDraft) -> Result<Option<MessageRef>, AppError> {
        let embed = CreateEmbed::new()
            .title(format!("📝 Draft: {}", draft.title))
            .description(truncate_chars(&draft.render_markdown(), MAX_DESCRIPTION))
            .color(DRAFT_COLOR)
            .footer(CreateEmbedFooter::new(format!(
                "Draft {} · {} role(s)",
                draft.id,
                draft.roles.len()
            )));
        let embed = match &draft.image_url {
            Some(url) => embed.image(url),
            None => embed,
        };

        let message = self
            .upsert_embed(draft.channel_id, draft.preview_message, embed)
            .await?;

        Ok(Some(message))
    }

    async fn render_public(&self, post: &PublishedPost) -> Result<Option<MessageRef>, AppError> {
        let embed = CreateEmbed::new()
            .title(post.title.clone())
            .description(truncate_chars(&post.render_markdown(), MAX_DESCRIPTION))
            .color(POST_COLOR)
            .footer(CreateEmbedFooter::new(format!(
                "Post {} · sign up with: do post signup {} <role>",
                post.id, post.id
            )));
        let embed = match &post.image_url {
            Some(url) => embed.image(url),
            None => embed,
        };

        let message = self
            .upsert_embed(post.channel_id, post.message, embed)
            .await?;

        Ok(Some(message))
    }

    async fn delete_messages(&self, messages: &[MessageRef]) -> Result<(), AppError> {
        let mut last_error = None;

        for message in messages {
            if let Err(e) = ChannelId::new(message.channel_id)
                .delete_message(&self.http, MessageId::new(message.message_id))
                .await
            {
                tracing::debug!(
                    "Failed to delete message {} in channel {}: {}",
                    message.message_id,
                    message.channel_id,
                    e
                );
                last_error = Some(e);
            }
        }

        match last_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
