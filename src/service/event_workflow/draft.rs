//! Draft phase: start, import, edit and cancel.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::{
    data::guild_store::{Scope, EVENT_POSTS},
    error::{workflow::WorkflowError, AppError},
    model::{
        draft::{DraftOptions, DraftStatus, EventDraft},
        event_post::{MessageRef, PublishedPost, RoleOption},
        external_event::ExternalEvent,
    },
    util::text::find_by_name,
};

use super::{EventWorkflow, StartedDraft};

impl EventWorkflow {
    /// Starts a wizard for `organizer_id`.
    ///
    /// Any draft the organizer already had is discarded and reported through
    /// `StartedDraft::replaced` so the caller can warn about it.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the event is for
    /// - `organizer_id` - User starting the wizard
    /// - `channel_id` - Channel the wizard runs in
    /// - `title` - Optional initial title
    ///
    /// # Returns
    /// - `StartedDraft` - The new draft and the replaced draft's ID, if any
    pub async fn start_draft(
        &self,
        guild_id: u64,
        organizer_id: u64,
        channel_id: u64,
        title: Option<&str>,
    ) -> StartedDraft {
        let draft = EventDraft::new(guild_id, organizer_id, channel_id, title, Utc::now());

        let previous = self
            .drafts
            .lock()
            .await
            .insert(organizer_id, draft.clone());

        let replaced = match previous {
            Some(previous) => {
                tracing::info!(
                    "Organizer {} replaced draft {} with {}",
                    organizer_id,
                    previous.id,
                    draft.id
                );
                self.log
                    .append(&format!(
                        "Draft {} replaced by {} (organizer {})",
                        previous.id, draft.id, organizer_id
                    ))
                    .await;
                self.delete_wizard_messages(&previous).await;
                Some(previous.id)
            }
            None => None,
        };

        self.refresh_preview(&draft).await;

        StartedDraft {
            draft: self.current(organizer_id).await.unwrap_or(draft),
            replaced,
        }
    }

    /// The organizer's active draft, if any.
    pub async fn active_draft(&self, organizer_id: u64) -> Option<EventDraft> {
        self.current(organizer_id).await
    }

    /// Finds a guild scheduled event by name.
    ///
    /// Uses an exact normalized match when there is one and a substring match otherwise.
    ///
    /// # Returns
    /// - `Ok(ExternalEvent)` - Best matching event
    /// - `Err(WorkflowError::ExternalEventUnavailable)` - Listing events failed
    /// - `Err(AppError::NotFound)` - No event matches
    pub async fn find_external_event(
        &self,
        guild_id: u64,
        query: &str,
    ) -> Result<ExternalEvent, AppError> {
        let events = self
            .calendar
            .list(guild_id)
            .await
            .map_err(|e| WorkflowError::ExternalEventUnavailable(e.to_string()))?;

        find_by_name(&events, query, |e| e.name.as_str())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No scheduled event matching `{}`.", query)))
    }

    /// Copies a scheduled event into the draft and links it.
    ///
    /// When a published post already references the event, the draft is discarded and the
    /// import fails, so one scheduled event never ends up with two posts.
    ///
    /// # Arguments
    /// - `actor` - User performing the import
    /// - `draft_id` - Draft to hydrate
    /// - `event` - Scheduled event snapshot
    ///
    /// # Returns
    /// - `Ok(EventDraft)` - Hydrated draft
    /// - `Err(WorkflowError::DuplicatePublication)` - Event already published; draft discarded
    /// - `Err(WorkflowError::NoActiveDraft | NotOrganizer)` - Draft missing or not the actor's
    pub async fn hydrate_from_external_event(
        &self,
        actor: u64,
        draft_id: &str,
        event: &ExternalEvent,
    ) -> Result<EventDraft, AppError> {
        let guild_id = self.owned_draft(actor, draft_id).await?.guild_id;

        let posts: BTreeMap<String, PublishedPost> =
            self.store.get(Scope::Guild(guild_id), EVENT_POSTS).await?;
        if let Some(existing) = posts
            .values()
            .find(|post| post.linked_event_id == Some(event.id))
        {
            if let Some(discarded) = self.take_draft(actor, draft_id).await {
                self.delete_wizard_messages(&discarded).await;
                self.log
                    .append(&format!(
                        "Discarded draft {}: scheduled event {} already published as {}",
                        discarded.id, event.id, existing.id
                    ))
                    .await;
            }
            return Err(WorkflowError::DuplicatePublication {
                external_event_id: event.id,
                post_id: existing.id.clone(),
            }
            .into());
        }

        let (_, draft) = self
            .mutate_draft(actor, draft_id, |draft| {
                draft.hydrate(event, Utc::now());
                Ok(())
            })
            .await?;

        Ok(draft)
    }

    pub async fn set_description(
        &self,
        actor: u64,
        draft_id: &str,
        text: &str,
    ) -> Result<EventDraft, AppError> {
        let (_, draft) = self
            .mutate_draft(actor, draft_id, |draft| {
                draft.set_description(text);
                Ok(())
            })
            .await?;

        Ok(draft)
    }

    /// Adds a role to the draft.
    ///
    /// # Returns
    /// - `Ok(RoleOption)` - The added role
    /// - `Err(WorkflowError::DuplicateRole)` - Normalized `(division, name)` already used
    /// - `Err(WorkflowError::Capacity)` - Role limit reached or capacity not a number
    pub async fn add_role(
        &self,
        actor: u64,
        draft_id: &str,
        division: &str,
        name: &str,
        capacity: Option<&str>,
        description: Option<&str>,
    ) -> Result<RoleOption, AppError> {
        let (role, _) = self
            .mutate_draft(actor, draft_id, |draft| {
                draft.add_role(division, name, capacity, description)
            })
            .await?;

        Ok(role)
    }

    /// Sets a role's emoji. An emoji wait that timed out simply never calls this.
    pub async fn set_role_emoji(
        &self,
        actor: u64,
        draft_id: &str,
        role_id: &str,
        emoji: &str,
    ) -> Result<EventDraft, AppError> {
        let (_, draft) = self
            .mutate_draft(actor, draft_id, |draft| {
                if draft.set_role_emoji(role_id, emoji) {
                    Ok(())
                } else {
                    Err(WorkflowError::UnknownRole(role_id.to_string()))
                }
            })
            .await?;

        Ok(draft)
    }

    pub async fn set_options(
        &self,
        actor: u64,
        draft_id: &str,
        options: DraftOptions,
    ) -> Result<EventDraft, AppError> {
        let (_, draft) = self
            .mutate_draft(actor, draft_id, |draft| draft.apply_options(options))
            .await?;

        Ok(draft)
    }

    /// Records a wizard message for cleanup on publish or cancel.
    pub async fn track_wizard_message(
        &self,
        actor: u64,
        draft_id: &str,
        message: MessageRef,
    ) -> Result<(), AppError> {
        let mut drafts = self.drafts.lock().await;
        let draft = find_owned(&mut drafts, actor, draft_id)?;
        draft.track_message(message);

        Ok(())
    }

    /// Cancels the draft; nothing is persisted.
    pub async fn cancel(&self, actor: u64, draft_id: &str) -> Result<EventDraft, AppError> {
        self.owned_draft(actor, draft_id).await?;
        let mut draft = self
            .take_draft(actor, draft_id)
            .await
            .ok_or(WorkflowError::NoActiveDraft)?;

        self.delete_wizard_messages(&draft).await;
        draft.status = DraftStatus::Canceled;

        tracing::info!("Draft {} cancelled by {}", draft.id, actor);
        self.log
            .append(&format!("Cancelled draft {} '{}' (organizer {})", draft.id, draft.title, actor))
            .await;

        Ok(draft)
    }

    /// Applies `edit` to the actor's draft, then re-renders the preview.
    async fn mutate_draft<R, F>(
        &self,
        actor: u64,
        draft_id: &str,
        edit: F,
    ) -> Result<(R, EventDraft), AppError>
    where
        F: FnOnce(&mut EventDraft) -> Result<R, WorkflowError>,
    {
        let snapshot = {
            let mut drafts = self.drafts.lock().await;
            let draft = find_owned(&mut drafts, actor, draft_id)?;
            let result = edit(&mut *draft)?;
            (result, draft.clone())
        };

        self.refresh_preview(&snapshot.1).await;
        let draft = self.current(actor).await.unwrap_or(snapshot.1);

        Ok((snapshot.0, draft))
    }

    async fn refresh_preview(&self, draft: &EventDraft) {
        match self.renderer.render_preview(draft).await {
            Ok(Some(message)) => {
                let mut drafts = self.drafts.lock().await;
                if let Some(current) = drafts
                    .get_mut(&draft.organizer_id)
                    .filter(|d| d.id == draft.id)
                {
                    current.preview_message = Some(message);
                    current.track_message(message);
                }
            }
            Ok(None) => {}
            Err(e) => {
                self.report(&format!("Failed to render preview of draft {}", draft.id), &e)
                    .await
            }
        }
    }

    pub(super) async fn delete_wizard_messages(&self, draft: &EventDraft) {
        if draft.wizard_messages.is_empty() {
            return;
        }
        if let Err(e) = self.renderer.delete_messages(&draft.wizard_messages).await {
            self.report(
                &format!("Failed to delete wizard messages of draft {}", draft.id),
                &e,
            )
            .await;
        }
    }

    async fn current(&self, organizer_id: u64) -> Option<EventDraft> {
        self.drafts.lock().await.get(&organizer_id).cloned()
    }

    /// Clone of the draft after the identity check.
    pub(super) async fn owned_draft(
        &self,
        actor: u64,
        draft_id: &str,
    ) -> Result<EventDraft, AppError> {
        let mut drafts = self.drafts.lock().await;
        Ok(find_owned(&mut drafts, actor, draft_id)?.clone())
    }

    /// Removes the draft from the registry if it is still the organizer's active one.
    pub(super) async fn take_draft(&self, organizer_id: u64, draft_id: &str) -> Option<EventDraft> {
        let mut drafts = self.drafts.lock().await;
        if drafts.get(&organizer_id).is_some_and(|d| d.id == draft_id) {
            drafts.remove(&organizer_id)
        } else {
            None
        }
    }
}

/// Looks a draft up by ID and checks that `actor` organizes it.
fn find_owned<'a>(
    drafts: &'a mut std::collections::HashMap<u64, EventDraft>,
    actor: u64,
    draft_id: &str,
) -> Result<&'a mut EventDraft, WorkflowError> {
    let draft = drafts
        .values_mut()
        .find(|d| d.id == draft_id)
        .ok_or(WorkflowError::NoActiveDraft)?;

    if draft.organizer_id != actor {
        return Err(WorkflowError::NotOrganizer);
    }

    Ok(draft)
}
