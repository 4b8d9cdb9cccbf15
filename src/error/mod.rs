//! Error types and user-facing error reporting.
//!
//! This module provides the application's error hierarchy. The `AppError` enum serves as
//! the top-level error type that wraps domain-specific errors. Command handlers reply with
//! `AppError::user_message()`, which passes workflow and input errors through verbatim and
//! replaces infrastructure failures with a generic notice after logging the details.

pub mod config;
pub mod internal;
pub mod workflow;

use thiserror::Error;

use crate::error::{config::ConfigError, internal::InternalError, workflow::WorkflowError};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most variants
/// use `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// A stored JSON value could not be encoded or decoded.
    #[error(transparent)]
    SerdeErr(#[from] serde_json::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Event wizard or published post operation was rejected.
    #[error(transparent)]
    WorkflowErr(#[from] WorkflowError),

    /// Resource not found error.
    ///
    /// # Fields
    /// - Message describing what resource was not found
    #[error("{0}")]
    NotFound(String),

    /// Invalid command input.
    ///
    /// # Fields
    /// - Message describing what was invalid about the input
    #[error("{0}")]
    BadRequest(String),

    /// Internal error indicating a bug or unexpected platform data.
    #[error(transparent)]
    InternalError(#[from] InternalError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Text shown to the user whose command failed.
    ///
    /// Workflow, not-found and bad-request errors are the user's to fix and are returned
    /// as-is. Everything else is logged and replaced with a generic notice so internal
    /// details never reach the channel.
    ///
    /// # Returns
    /// - `String` - Message suitable for replying in the invoking channel
    pub fn user_message(&self) -> String {
        match self {
            Self::WorkflowErr(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::DiscordErr(err) if discord_status(err) == Some(403) => {
                tracing::warn!("Missing Discord permission: {}", err);
                "❌ I don't have permission to do that!".to_string()
            }
            err => {
                tracing::error!("Command failed: {}", err);
                "Something went wrong while handling that command. Check the bot logs.".to_string()
            }
        }
    }
}

/// HTTP status of a failed Discord REST call, if the error came from one.
pub fn discord_status(err: &serenity::Error) -> Option<u16> {
    match err {
        serenity::Error::Http(serenity::http::HttpError::UnsuccessfulRequest(response)) => {
            Some(response.status_code.as_u16())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_errors_pass_through_to_user() {
        let err = AppError::from(WorkflowError::RoleFull {
            role: "Tank".to_string(),
            current: 1,
            capacity: 1,
        });

        assert_eq!(err.user_message(), "**Tank** is full (1/1).");
    }

    #[test]
    fn infrastructure_errors_are_masked() {
        let err = AppError::from(sea_orm::DbErr::Custom("disk I/O error".to_string()));

        let message = err.user_message();

        assert!(!message.contains("disk I/O"));
    }
}
