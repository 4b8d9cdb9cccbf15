//! Scheduled events through the Discord REST API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::{
    all::{EditScheduledEvent, GuildId, ScheduledEventId, Timestamp, UserId},
    async_trait,
    http::{Http, UserPagination},
};

use crate::{
    error::{discord_status, internal::InternalError, AppError},
    model::external_event::{CalendarPatch, ExternalEvent},
    service::calendar::ScheduledEvents,
};

/// Page size of the interested-users endpoint.
const USERS_PAGE: u64 = 100;

pub struct DiscordScheduledEvents {
    http: Arc<Http>,
}

impl DiscordScheduledEvents {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ScheduledEvents for DiscordScheduledEvents {
    async fn list(&self, guild_id: u64) -> Result<Vec<ExternalEvent>, AppError> {
        let events = self
            .http
            .get_scheduled_events(GuildId::new(guild_id), true)
            .await?;

        Ok(events.iter().map(ExternalEvent::from_scheduled_event).collect())
    }

    async fn fetch(&self, guild_id: u64, event_id: u64) -> Result<Option<ExternalEvent>, AppError> {
        match self
            .http
            .get_scheduled_event(GuildId::new(guild_id), ScheduledEventId::new(event_id), true)
            .await
        {
            Ok(event) => Ok(Some(ExternalEvent::from_scheduled_event(&event))),
            Err(e) if discord_status(&e) == Some(404) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        guild_id: u64,
        event_id: u64,
        patch: &CalendarPatch,
    ) -> Result<(), AppError> {
        let mut builder = EditScheduledEvent::new()
            .name(patch.name.clone())
            .description(patch.description.clone());
        if let Some(start) = patch.start {
            builder = builder.start_time(to_timestamp(start)?);
        }
        if let Some(end) = patch.end {
            builder = builder.end_time(to_timestamp(end)?);
        }

        GuildId::new(guild_id)
            .edit_scheduled_event(&self.http, ScheduledEventId::new(event_id), builder)
            .await?;

        Ok(())
    }

    async fn interested_users(&self, guild_id: u64, event_id: u64) -> Result<Vec<u64>, AppError> {
        let mut users = Vec::new();
        let mut after: Option<UserId> = None;

        loop {
            let page = self
                .http
                .get_scheduled_event_users(
                    GuildId::new(guild_id),
                    ScheduledEventId::new(event_id),
                    Some(USERS_PAGE),
                    after.map(UserPagination::After),
                    Some(false),
                )
                .await?;

            let count = page.len() as u64;
            users.extend(page.iter().map(|u| u.user.id.get()));
            after = page.last().map(|u| u.user.id);

            if count < USERS_PAGE || after.is_none() {
                break;
            }
        }

        Ok(users)
    }
}

fn to_timestamp(time: DateTime<Utc>) -> Result<Timestamp, AppError> {
    Timestamp::from_unix_timestamp(time.timestamp()).map_err(|e| {
        InternalError::InvalidDiscordTimestamp {
            timestamp: time.timestamp(),
            reason: e.to_string(),
        }
        .into()
    })
}
