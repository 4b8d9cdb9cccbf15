//! Discord presentation layer.
//!
//! Receives gateway events through Serenity, parses text commands and calls the service
//! layer. Also provides the Discord implementations of the `Renderer` and
//! `ScheduledEvents` traits used by the event workflow.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild, channel and role cache
//! - `GUILD_MESSAGES` / `MESSAGE_CONTENT` - Text commands (`MESSAGE_CONTENT` is privileged)
//! - `GUILD_MEMBERS` - Member listings (privileged)
//! - `GUILD_MESSAGE_REACTIONS` - Emoji selection in the wizard
//! - `GUILD_SCHEDULED_EVENTS` - Scheduled event cache

pub mod calendar;
pub mod command;
pub mod handler;
pub mod renderer;
pub mod start;
