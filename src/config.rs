use std::path::PathBuf;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_DATABASE_URL: &str = "sqlite://discoops.db?mode=rwc";
const DEFAULT_COMMAND_PREFIX: &str = "!";
const DEFAULT_LOG_FILE_PATH: &str = "discoops.log";

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,
    /// Text command prefix; commands read `<prefix>do ...`.
    pub command_prefix: String,
    pub log_file_path: PathBuf,
    /// Restricts the diagnostic commands to this user when set.
    pub bot_owner_id: Option<u64>,
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(AppError::ConfigErr)` - A required variable is missing or a value is invalid
    pub fn from_env() -> Result<Self, AppError> {
        let bot_owner_id = match std::env::var("BOT_OWNER_ID") {
            Ok(value) if !value.trim().is_empty() => {
                Some(value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                    name: "BOT_OWNER_ID".to_string(),
                    reason: e.to_string(),
                })?)
            }
            _ => None,
        };

        let command_prefix =
            std::env::var("COMMAND_PREFIX").unwrap_or_else(|_| DEFAULT_COMMAND_PREFIX.to_string());
        if command_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                name: "COMMAND_PREFIX".to_string(),
                reason: "prefix cannot be blank".to_string(),
            }
            .into());
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            command_prefix: command_prefix.trim().to_string(),
            log_file_path: std::env::var("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE_PATH)),
            bot_owner_id,
        })
    }
}
