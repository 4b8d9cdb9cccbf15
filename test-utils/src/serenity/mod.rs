//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity structs by deserializing JSON, simulating
//! what Discord's API would return, so conversions from platform objects into domain
//! models can be tested without a gateway connection.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::create_test_scheduled_event;
//!
//! let event = create_test_scheduled_event(555, 123456789, "Raid Night", "2030-01-01T20:00:00Z");
//! ```
//!
//! # Available Factories
//!
//! - `scheduled_event::create_test_scheduled_event` - Create Serenity ScheduledEvent objects

pub mod scheduled_event;

pub use scheduled_event::create_test_scheduled_event;
