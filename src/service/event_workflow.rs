//! Event wizard drafts and published post signups.
//!
//! `EventWorkflow` owns two in-memory registries: the active draft of each organizer
//! (entries removed on publish or cancel) and one publish lock per draft ID (created on
//! demand and never removed, the ID space being small and short-lived). Published posts
//! live in the guild store under `event_posts`; every interest or signup change goes
//! through `GuildStore::update` so capacity checks and writes are atomic.
//!
//! Presentation is delegated to a `Renderer` and calendar access to `ScheduledEvents`.
//! Failures of either are logged to `tracing` and the `LogSink` and never abort the
//! operation that triggered them.

mod draft;
mod publish;
mod signup;

#[cfg(test)]
mod test;

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::{
    data::guild_store::GuildStore,
    error::AppError,
    model::{draft::EventDraft, event_post::PublishedPost},
    service::{calendar::ScheduledEvents, log_sink::LogSink, renderer::Renderer},
};

pub use signup::{RoleChoice, Signup};

/// Result of starting a wizard.
#[derive(Debug, Clone)]
pub struct StartedDraft {
    pub draft: EventDraft,
    /// ID of the organizer's previous draft, discarded by this start.
    pub replaced: Option<String>,
}

pub struct EventWorkflow {
    store: GuildStore,
    log: Arc<LogSink>,
    renderer: Arc<dyn Renderer>,
    calendar: Arc<dyn ScheduledEvents>,
    /// Active draft per organizer user ID.
    drafts: Mutex<HashMap<u64, EventDraft>>,
    /// Publish lock per draft ID.
    publish_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EventWorkflow {
    pub fn new(
        store: GuildStore,
        log: Arc<LogSink>,
        renderer: Arc<dyn Renderer>,
        calendar: Arc<dyn ScheduledEvents>,
    ) -> Self {
        Self {
            store,
            log,
            renderer,
            calendar,
            drafts: Mutex::new(HashMap::new()),
            publish_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn calendar(&self) -> &Arc<dyn ScheduledEvents> {
        &self.calendar
    }

    /// Logs a swallowed collaborator failure to tracing and the log file.
    async fn report(&self, context: &str, err: &AppError) {
        tracing::warn!("{}: {}", context, err);
        self.log.append(&format!("{}: {}", context, err)).await;
    }

    /// Refreshes the public post and records the message it was rendered to.
    async fn refresh_public(&self, post: &mut PublishedPost) {
        match self.renderer.render_public(post).await {
            Ok(Some(message)) if post.message != Some(message) => {
                post.message = Some(message);
                if let Err(e) = self.store_message_ref(post).await {
                    self.report(&format!("Failed to store message of post {}", post.id), &e)
                        .await;
                }
            }
            Ok(_) => {}
            Err(e) => {
                self.report(&format!("Failed to render post {}", post.id), &e)
                    .await
            }
        }
    }
}
