use serenity::async_trait;

use crate::{
    error::AppError,
    model::{
        draft::EventDraft,
        event_post::{MessageRef, PublishedPost},
    },
};

/// Presentation of drafts and published posts.
///
/// The workflow calls this after every mutation. Implementations edit the existing
/// message when the draft or post already references one and send a new message
/// otherwise. Errors are logged by the caller and never abort the operation.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Shows the organizer's preview of `draft`.
    ///
    /// # Returns
    /// - `Ok(Some(MessageRef))` - Message now showing the preview
    /// - `Ok(None)` - Nothing was rendered
    async fn render_preview(&self, draft: &EventDraft) -> Result<Option<MessageRef>, AppError>;

    /// Shows or refreshes the public post with live counts.
    async fn render_public(&self, post: &PublishedPost) -> Result<Option<MessageRef>, AppError>;

    /// Deletes rendered messages, continuing past individual failures.
    async fn delete_messages(&self, messages: &[MessageRef]) -> Result<(), AppError>;
}
