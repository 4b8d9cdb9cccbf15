//! Domain models for the event wizard, published posts and guild listings.
//!
//! Models are plain serde-serializable structs. Persisted models (`PublishedPost`,
//! `RoleOption`) are stored as JSON values in the guild store; in-memory models
//! (`EventDraft`) never touch the database. Platform objects from Serenity are
//! converted into these types at the bot boundary.

pub mod draft;
pub mod event_post;
pub mod external_event;
pub mod guild;
