//! Publish phase.

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    data::guild_store::{Scope, EVENT_POSTS},
    error::{workflow::WorkflowError, AppError},
    model::{
        draft::{DraftStatus, EventDraft},
        event_post::PublishedPost,
    },
};

use super::EventWorkflow;

impl EventWorkflow {
    /// Publishes a draft to `channel_id`.
    ///
    /// Runs under the draft's publish lock. The duplicate check and the insert of the new
    /// record happen in one store update. Rendering, calendar sync-back and wizard cleanup
    /// that follow are best-effort: their failures are logged and publication still succeeds.
    ///
    /// # Arguments
    /// - `actor` - User publishing; must be the organizer
    /// - `draft_id` - Draft to publish
    /// - `channel_id` - Destination channel of the public post
    ///
    /// # Returns
    /// - `Ok(PublishedPost)` - Persisted record, with its message reference when rendered
    /// - `Err(WorkflowError::DuplicatePublication)` - The linked event already has a post
    /// - `Err(WorkflowError::NoActiveDraft | NotOrganizer)` - Draft missing or not the actor's
    pub async fn publish(
        &self,
        actor: u64,
        draft_id: &str,
        channel_id: u64,
    ) -> Result<PublishedPost, AppError> {
        let lock = self.publish_lock(draft_id).await;
        let _guard = lock.lock().await;

        let mut draft = self.owned_draft(actor, draft_id).await?;
        let record = PublishedPost::from_draft(&draft, channel_id, Utc::now());

        let mut post = self
            .store
            .update(
                Scope::Guild(draft.guild_id),
                EVENT_POSTS,
                |posts: &mut BTreeMap<String, PublishedPost>| {
                    if let Some(linked) = record.linked_event_id {
                        if let Some(existing) = posts
                            .values()
                            .find(|p| p.linked_event_id == Some(linked))
                        {
                            return Err(WorkflowError::DuplicatePublication {
                                external_event_id: linked,
                                post_id: existing.id.clone(),
                            }
                            .into());
                        }
                    }
                    if posts.contains_key(&record.id) {
                        return Err(AppError::BadRequest(format!(
                            "Draft `{}` has already been published.",
                            record.id
                        )));
                    }

                    posts.insert(record.id.clone(), record.clone());
                    Ok(record)
                },
            )
            .await?;

        self.refresh_public(&mut post).await;

        if let (true, Some(event_id)) = (draft.sync_back, draft.linked_event_id()) {
            if let Err(e) = self.sync_back(&draft, event_id).await {
                self.report(
                    &format!("Calendar sync-back of event {} skipped", event_id),
                    &e,
                )
                .await;
            }
        }

        // The registry copy holds the latest tracked wizard messages
        if let Some(current) = self.take_draft(draft.organizer_id, &draft.id).await {
            draft = current;
        }
        self.delete_wizard_messages(&draft).await;
        draft.status = DraftStatus::Published;

        tracing::info!(
            "Published event {} '{}' in guild {} by {}",
            post.id,
            post.title,
            post.guild_id,
            actor
        );
        self.log
            .append(&format!(
                "Published event {} '{}' to channel {} (organizer {}, linked event {})",
                post.id,
                post.title,
                post.channel_id,
                post.organizer_id,
                post.linked_event_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "none".to_string())
            ))
            .await;

        Ok(post)
    }

    /// Pushes the draft's edits to its linked scheduled event.
    ///
    /// # Returns
    /// - `Ok(())` - Event updated
    /// - `Err(WorkflowError::ExternalEventUnavailable)` - Event no longer exists
    /// - `Err(AppError)` - Platform call failed
    async fn sync_back(&self, draft: &EventDraft, event_id: u64) -> Result<(), AppError> {
        if self.calendar.fetch(draft.guild_id, event_id).await?.is_none() {
            return Err(WorkflowError::ExternalEventUnavailable(format!(
                "scheduled event {} no longer exists",
                event_id
            ))
            .into());
        }

        self.calendar
            .update(draft.guild_id, event_id, &draft.calendar_patch())
            .await
    }

    /// The lock guarding publication of `draft_id`, created on first use.
    async fn publish_lock(&self, draft_id: &str) -> Arc<Mutex<()>> {
        self.publish_locks
            .lock()
            .await
            .entry(draft_id.to_string())
            .or_default()
            .clone()
    }
}
