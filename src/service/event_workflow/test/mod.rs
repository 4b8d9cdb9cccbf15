use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex as StdMutex,
};

use chrono::{TimeZone, Utc};
use serenity::async_trait;
use test_utils::{builder::TestBuilder, context::TestContext};

use crate::{
    data::guild_store::GuildStore,
    error::{workflow::WorkflowError, AppError},
    model::{
        draft::EventDraft,
        event_post::{MessageRef, PublishedPost},
        external_event::{CalendarPatch, ExternalEvent, ExternalEventStatus},
    },
    service::{
        calendar::ScheduledEvents, event_workflow::EventWorkflow, log_sink::LogSink,
        renderer::Renderer,
    },
};

mod draft;

const GUILD: u64 = 1000;
const CHANNEL: u64 = 2000;
const ORGANIZER: u64 = 3000;

/// Renderer that records calls and hands out sequential message IDs.
#[derive(Default)]
struct FakeRenderer {
    next_id: AtomicU64,
    previews: StdMutex<Vec<String>>,
    publics: StdMutex<Vec<PublishedPost>>,
    deleted: StdMutex<Vec<MessageRef>>,
    fail: bool,
}

impl FakeRenderer {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn message(&self, channel_id: u64, existing: Option<MessageRef>) -> MessageRef {
        existing.unwrap_or_else(|| MessageRef {
            channel_id,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        })
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn render_preview(&self, draft: &EventDraft) -> Result<Option<MessageRef>, AppError> {
        if self.fail {
            return Err(AppError::BadRequest("preview unavailable".to_string()));
        }
        self.previews.lock().unwrap().push(draft.render_markdown());
        Ok(Some(self.message(draft.channel_id, draft.preview_message)))
    }

    async fn render_public(&self, post: &PublishedPost) -> Result<Option<MessageRef>, AppError> {
        if self.fail {
            return Err(AppError::BadRequest("channel unavailable".to_string()));
        }
        self.publics.lock().unwrap().push(post.clone());
        Ok(Some(self.message(post.channel_id, post.message)))
    }

    async fn delete_messages(&self, messages: &[MessageRef]) -> Result<(), AppError> {
        self.deleted.lock().unwrap().extend_from_slice(messages);
        Ok(())
    }
}

/// Calendar serving a fixed event list and recording sync-back patches.
#[derive(Default)]
struct FakeCalendar {
    events: Vec<ExternalEvent>,
    updates: StdMutex<Vec<(u64, CalendarPatch)>>,
    fail_updates: bool,
}

#[async_trait]
impl ScheduledEvents for FakeCalendar {
    async fn list(&self, _guild_id: u64) -> Result<Vec<ExternalEvent>, AppError> {
        Ok(self.events.clone())
    }

    async fn fetch(&self, _guild_id: u64, event_id: u64) -> Result<Option<ExternalEvent>, AppError> {
        Ok(self.events.iter().find(|e| e.id == event_id).cloned())
    }

    async fn update(
        &self,
        _guild_id: u64,
        event_id: u64,
        patch: &CalendarPatch,
    ) -> Result<(), AppError> {
        if self.fail_updates {
            return Err(AppError::NotFound(format!("event {} vanished", event_id)));
        }
        self.updates.lock().unwrap().push((event_id, patch.clone()));
        Ok(())
    }

    async fn interested_users(&self, _guild_id: u64, _event_id: u64) -> Result<Vec<u64>, AppError> {
        Ok(Vec::new())
    }
}

struct Harness {
    workflow: EventWorkflow,
    renderer: Arc<FakeRenderer>,
    calendar: Arc<FakeCalendar>,
    log: Arc<LogSink>,
    _dir: tempfile::TempDir,
    _test: TestContext,
}

async fn harness_with(renderer: FakeRenderer, calendar: FakeCalendar) -> Harness {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap().clone();
    let dir = tempfile::tempdir().unwrap();

    let store = GuildStore::new(db);
    let log = Arc::new(LogSink::load(dir.path().join("test.log"), store.clone()).await);
    let renderer = Arc::new(renderer);
    let calendar = Arc::new(calendar);
    let workflow = EventWorkflow::new(store, log.clone(), renderer.clone(), calendar.clone());

    Harness {
        workflow,
        renderer,
        calendar,
        log,
        _dir: dir,
        _test: test,
    }
}

async fn harness() -> Harness {
    harness_with(
        FakeRenderer::default(),
        FakeCalendar {
            events: vec![external_event(555, "Fleet Op")],
            ..Default::default()
        },
    )
    .await
}

fn external_event(id: u64, name: &str) -> ExternalEvent {
    ExternalEvent {
        id,
        guild_id: GUILD,
        name: name.to_string(),
        description: Some(format!("{} description", name)),
        start: Utc.with_ymd_and_hms(2030, 1, 1, 20, 0, 0).unwrap(),
        end: None,
        image_url: None,
        creator_id: Some(9),
        location: None,
        status: ExternalEventStatus::Scheduled,
        user_count: Some(3),
    }
}

/// Starts a draft and adds one capped role, returning the draft ID.
async fn draft_with_role(h: &Harness, organizer: u64, capacity: &str) -> String {
    let started = h
        .workflow
        .start_draft(GUILD, organizer, CHANNEL, Some("Raid Night"))
        .await;
    h.workflow
        .add_role(organizer, &started.draft.id, "Hugin", "Tank", Some(capacity), None)
        .await
        .unwrap();
    started.draft.id
}
