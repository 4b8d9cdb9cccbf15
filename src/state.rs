//! Shared state handed to the Discord event handler.
//!
//! Built once in `main` after the database is migrated. Every field is cheap to share:
//! the store wraps a connection pool, the services sit behind `Arc`.

use std::sync::Arc;

use crate::{
    data::guild_store::GuildStore,
    service::{event_workflow::EventWorkflow, log_sink::LogSink},
};

#[derive(Clone)]
pub struct AppState {
    pub store: GuildStore,
    pub log: Arc<LogSink>,
    pub workflow: Arc<EventWorkflow>,
    pub command_prefix: String,
    pub bot_owner_id: Option<u64>,
}
