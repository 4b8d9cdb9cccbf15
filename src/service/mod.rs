//! Business logic between the bot layer and the data layer.
//!
//! Services take plain values, not Serenity objects, and return domain models or
//! `AppError`. Platform access the workflow needs is expressed through the `Renderer`
//! and `ScheduledEvents` traits so it can be replaced in tests.

pub mod calendar;
pub mod destination;
pub mod division;
pub mod event_role;
pub mod event_workflow;
pub mod log_sink;
pub mod member;
pub mod renderer;
